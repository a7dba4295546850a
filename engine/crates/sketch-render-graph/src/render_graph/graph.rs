//! 依赖图构建和拓扑排序
//!
//! 分析 Pass 之间的资源依赖关系，构建 DAG 并进行拓扑排序。

use crate::render_graph::resource_handle::RgImageHandle;
use std::collections::{HashMap, HashSet, VecDeque};

/// 依赖边：从 producer 到 consumer
#[derive(Clone, Debug)]
pub struct DependencyEdge {
    /// 生产者 Pass 索引
    pub producer: usize,
    /// 消费者 Pass 索引
    pub consumer: usize,
    /// 产生依赖的图像
    pub images: Vec<RgImageHandle>,
}

/// 依赖图
///
/// 表示 Pass 之间的依赖关系，用于拓扑排序和执行顺序计算。
pub struct DependencyGraph {
    pass_count: usize,
    /// 邻接表（出边）
    adjacency: Vec<Vec<usize>>,
    in_degrees: Vec<usize>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn new(pass_count: usize) -> Self {
        Self {
            pass_count,
            adjacency: vec![Vec::new(); pass_count],
            in_degrees: vec![0; pass_count],
            edges: Vec::new(),
        }
    }

    /// 添加依赖边
    ///
    /// 同一对 Pass 之间只保留一条边，涉及的图像合并到这条边上。
    pub fn add_edge(&mut self, producer: usize, consumer: usize, image: RgImageHandle) {
        if let Some(edge) = self.edges.iter_mut().find(|e| e.producer == producer && e.consumer == consumer) {
            if !edge.images.contains(&image) {
                edge.images.push(image);
            }
            return;
        }

        self.adjacency[producer].push(consumer);
        self.in_degrees[consumer] += 1;
        self.edges.push(DependencyEdge {
            producer,
            consumer,
            images: vec![image],
        });
    }

    /// 执行拓扑排序（Kahn 算法，入度相同时保持添加顺序）
    ///
    /// # 返回
    /// - `Ok(order)`: 拓扑排序后的 Pass 索引列表
    /// - `Err(cycle)`: 检测到循环依赖，返回参与循环的 Pass 索引
    pub fn topological_sort(&self) -> Result<Vec<usize>, Vec<usize>> {
        let mut in_degrees = self.in_degrees.clone();
        let mut queue: VecDeque<usize> = (0..self.pass_count).filter(|&i| in_degrees[i] == 0).collect();
        let mut result = Vec::with_capacity(self.pass_count);

        while let Some(node) = queue.pop_front() {
            result.push(node);

            for &neighbor in &self.adjacency[node] {
                in_degrees[neighbor] -= 1;
                if in_degrees[neighbor] == 0 {
                    queue.push_back(neighbor);
                }
            }
        }

        if result.len() != self.pass_count {
            let remaining: Vec<usize> = (0..self.pass_count).filter(|&i| in_degrees[i] > 0).collect();
            Err(remaining)
        } else {
            Ok(result)
        }
    }

    /// 获取 Pass 的直接依赖（前驱）
    pub fn get_predecessors(&self, pass_index: usize) -> Vec<usize> {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(_, adj)| adj.contains(&pass_index))
            .map(|(i, _)| i)
            .collect()
    }

    /// 获取 Pass 的直接后继
    pub fn get_successors(&self, pass_index: usize) -> &[usize] {
        &self.adjacency[pass_index]
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }
}

/// 依赖分析器
///
/// 从 Pass 的读写声明构建依赖图，Pass 的添加顺序即为提交顺序。
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// 分析资源依赖，构建依赖图
    ///
    /// 规则：
    /// - 写后读（RAW）：reader 依赖 writer
    /// - 读后写（WAR）：writer 依赖之前的 reader（保证读取完成）
    /// - 写后写（WAW）：后一个 writer 依赖前一个 writer
    pub fn analyze(
        pass_count: usize,
        image_reads: &[Vec<RgImageHandle>],
        image_writes: &[Vec<RgImageHandle>],
    ) -> DependencyGraph {
        let mut graph = DependencyGraph::new(pass_count);

        // 每个资源的最后写入者
        let mut last_writer: HashMap<RgImageHandle, usize> = HashMap::new();
        // 每个资源在最后一次写入后的所有读取者
        let mut readers_since_write: HashMap<RgImageHandle, HashSet<usize>> = HashMap::new();

        for pass_idx in 0..pass_count {
            for &image in &image_reads[pass_idx] {
                if let Some(&writer) = last_writer.get(&image) {
                    if writer != pass_idx {
                        graph.add_edge(writer, pass_idx, image);
                    }
                }
                readers_since_write.entry(image).or_default().insert(pass_idx);
            }

            for &image in &image_writes[pass_idx] {
                if let Some(readers) = readers_since_write.get(&image) {
                    let mut readers = readers.iter().copied().filter(|&r| r != pass_idx).collect::<Vec<_>>();
                    readers.sort_unstable();
                    for reader in readers {
                        graph.add_edge(reader, pass_idx, image);
                    }
                }

                if let Some(&prev_writer) = last_writer.get(&image) {
                    if prev_writer != pass_idx {
                        graph.add_edge(prev_writer, pass_idx, image);
                    }
                }

                last_writer.insert(image, pass_idx);
                readers_since_write.insert(image, HashSet::new());
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn make_images(count: usize) -> Vec<RgImageHandle> {
        let mut keys: SlotMap<RgImageHandle, ()> = SlotMap::with_key();
        (0..count).map(|_| keys.insert(())).collect()
    }

    #[test]
    fn test_simple_dependency() {
        // Pass 0 写入 image 0
        // Pass 1 读取 image 0
        let img = make_images(1);
        let image_reads = vec![vec![], vec![img[0]]];
        let image_writes = vec![vec![img[0]], vec![]];

        let graph = DependencyAnalyzer::analyze(2, &image_reads, &image_writes);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(graph.get_predecessors(1), vec![0]);
    }

    #[test]
    fn test_chain_dependency() {
        // Pass 0 -> Pass 1 -> Pass 2
        let img = make_images(2);
        let image_reads = vec![vec![], vec![img[0]], vec![img[1]]];
        let image_writes = vec![vec![img[0]], vec![img[1]], vec![]];

        let graph = DependencyAnalyzer::analyze(3, &image_reads, &image_writes);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_passes() {
        // Pass 0 写入 image 0
        // Pass 1 写入 image 1（无依赖，可并行）
        // Pass 2 读取 image 0 和 image 1
        let img = make_images(2);
        let image_reads = vec![vec![], vec![], vec![img[0], img[1]]];
        let image_writes = vec![vec![img[0]], vec![img[1]], vec![]];

        let graph = DependencyAnalyzer::analyze(3, &image_reads, &image_writes);

        let order = graph.topological_sort().unwrap();
        assert!(order[0] == 0 || order[0] == 1);
        assert!(order[1] == 0 || order[1] == 1);
        assert_eq!(order[2], 2);
    }

    #[test]
    fn test_write_after_read() {
        // Pass 0 读取 image 0，Pass 1 随后覆盖 image 0
        let img = make_images(1);
        let image_reads = vec![vec![img[0]], vec![]];
        let image_writes = vec![vec![], vec![img[0]]];

        let graph = DependencyAnalyzer::analyze(2, &image_reads, &image_writes);

        assert_eq!(graph.get_successors(0), &[1]);
        assert_eq!(graph.topological_sort().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_read_write_accumulation_merges_edges() {
        // 两个 Pass 都对同一张图像做读写累积
        let img = make_images(1);
        let image_reads = vec![vec![img[0]], vec![img[0]]];
        let image_writes = vec![vec![img[0]], vec![img[0]]];

        let graph = DependencyAnalyzer::analyze(2, &image_reads, &image_writes);

        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].images, vec![img[0]]);
        assert_eq!(graph.topological_sort().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = DependencyGraph::new(2);
        let img = make_images(1);
        graph.add_edge(0, 1, img[0]);
        graph.add_edge(1, 0, img[0]);

        assert_eq!(graph.topological_sort(), Err(vec![0, 1]));
    }
}
