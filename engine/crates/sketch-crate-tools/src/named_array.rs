/// 创建一个带有索引的常量枚举表
///
/// 每个变体对应一个静态值，变体的声明顺序即为索引顺序。
///
/// ```ignore
/// enumed_map!(pub HatchLevel<&'static str>: {
///     Level0: "InputHatchTexture0",
///     Level1: "InputHatchTexture1",
/// });
///
/// assert_eq!(HatchLevel::Level1.index(), 1);
/// ```
#[macro_export]
macro_rules! enumed_map {
    ($vis:vis $enum_name:ident<$vtype:ty>: { $($variant:ident: $value:expr),* $(,)? }) => {
        #[repr(usize)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $enum_name {
            $($variant,)*
        }

        impl $enum_name {
            pub const COUNT: usize = $crate::count_indexed_array!($($variant),*);

            const ALL: [Self; $crate::count_indexed_array!($($variant),*)] = [$(Self::$variant,)*];

            fn get_array() -> &'static [$vtype; Self::COUNT] {
                // 使用 OnceLock 实现延迟初始化的静态数组
                static ARRAY: std::sync::OnceLock<[$vtype; $crate::count_indexed_array!($($variant),*)]> =
                    std::sync::OnceLock::new();

                ARRAY.get_or_init(|| [
                    $($value,)*
                ])
            }

            pub fn value(self) -> &'static $vtype {
                &Self::get_array()[self as usize]
            }

            pub const fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            /// 按索引升序遍历
            pub fn iter() -> impl Iterator<Item = Self> {
                Self::ALL.into_iter()
            }
        }
    };
}

/// 辅助宏，计算变体数量
#[macro_export]
macro_rules! count_indexed_array {
    () => (0);
    ($head:tt $(, $tail:tt)*) => (1 + $crate::count_indexed_array!($($tail),*));
}

#[cfg(test)]
mod tests {
    enumed_map!(Stage<&'static str>: {
        First: "first",
        Second: "second",
        Third: "third",
    });

    #[test]
    fn test_index_and_value() {
        assert_eq!(Stage::COUNT, 3);
        assert_eq!(Stage::Second.index(), 1);
        assert_eq!(*Stage::Third.value(), "third");
        assert_eq!(Stage::from_index(0), Some(Stage::First));
        assert_eq!(Stage::from_index(3), None);
    }

    #[test]
    fn test_iter_in_declaration_order() {
        let names: Vec<_> = Stage::iter().map(|s| *s.value()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
