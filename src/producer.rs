//! Streams parsed results into the two query-engine-facing shapes: fixed-size
//! flat row batches (§4.7) and one nested record per file (§4.8).
//!
//! Column order here matches the flat table schema's contract order exactly;
//! reordering fields is a breaking change for any embedder binding by index.

use crate::node::{ASTNode, ASTResult, NativeContext};

/// One column-major batch of up to `BATCH_SIZE` node rows. `name`/`peek`/
/// `parent_id` carry `None` for their NULL cases (empty name, no peek
/// computed, root node respectively); every other string column uses `""`
/// rather than NULL when empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowBatch {
    pub node_id: Vec<u64>,
    pub type_raw: Vec<String>,
    pub name: Vec<Option<String>>,
    pub file_path: Vec<String>,
    pub language: Vec<String>,
    pub start_line: Vec<u32>,
    pub start_column: Vec<u32>,
    pub end_line: Vec<u32>,
    pub end_column: Vec<u32>,
    pub parent_id: Vec<Option<i64>>,
    pub depth: Vec<u32>,
    pub sibling_index: Vec<u32>,
    pub children_count: Vec<u32>,
    pub descendant_count: Vec<u32>,
    pub peek: Vec<Option<String>>,
    pub semantic_type: Vec<u8>,
    pub universal_flags: Vec<u8>,
    pub arity_bin: Vec<u8>,
    pub native: Vec<Option<NativeContext>>,
}

impl RowBatch {
    fn with_capacity(n: usize) -> Self {
        RowBatch {
            node_id: Vec::with_capacity(n),
            type_raw: Vec::with_capacity(n),
            name: Vec::with_capacity(n),
            file_path: Vec::with_capacity(n),
            language: Vec::with_capacity(n),
            start_line: Vec::with_capacity(n),
            start_column: Vec::with_capacity(n),
            end_line: Vec::with_capacity(n),
            end_column: Vec::with_capacity(n),
            parent_id: Vec::with_capacity(n),
            depth: Vec::with_capacity(n),
            sibling_index: Vec::with_capacity(n),
            children_count: Vec::with_capacity(n),
            descendant_count: Vec::with_capacity(n),
            peek: Vec::with_capacity(n),
            semantic_type: Vec::with_capacity(n),
            universal_flags: Vec::with_capacity(n),
            arity_bin: Vec::with_capacity(n),
            native: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.node_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_id.is_empty()
    }

    fn push(&mut self, node: &ASTNode) {
        self.node_id.push(node.node_id);
        self.type_raw.push(node.type_raw.clone());
        self.name.push(node.name.clone().filter(|s| !s.is_empty()));
        self.file_path.push(node.file_path.clone());
        self.language.push(node.language.clone());
        self.start_line.push(node.start_line);
        self.start_column.push(node.start_column);
        self.end_line.push(node.end_line);
        self.end_column.push(node.end_column);
        self.parent_id.push(if node.parent_id < 0 { None } else { Some(node.parent_id) });
        self.depth.push(node.depth);
        self.sibling_index.push(node.sibling_index);
        self.children_count.push(node.children_count);
        self.descendant_count.push(node.descendant_count);
        self.peek.push(node.peek.clone().filter(|s| !s.is_empty()));
        self.semantic_type.push(node.semantic_type);
        self.universal_flags.push(node.universal_flags);
        self.arity_bin.push(node.arity_bin);
        self.native.push(node.native.clone());
    }
}

/// Drains a slice of `ASTResult`s as fixed-size `RowBatch`es, tracking the
/// two cursors described in §4.7: which result is current, and how far into
/// its node list the last batch reached.
pub struct TableProducer<'a> {
    results: &'a [ASTResult],
    batch_size: usize,
    result_index: usize,
    row_index: usize,
}

impl<'a> TableProducer<'a> {
    pub fn new(results: &'a [ASTResult], batch_size: u32) -> Self {
        TableProducer {
            results,
            batch_size: batch_size.max(1) as usize,
            result_index: 0,
            row_index: 0,
        }
    }

    /// Pulls the next batch, or `None` once every result is drained.
    pub fn next_batch(&mut self) -> Option<RowBatch> {
        if self.result_index >= self.results.len() {
            return None;
        }
        let mut batch = RowBatch::with_capacity(self.batch_size);
        while batch.len() < self.batch_size && self.result_index < self.results.len() {
            let result = &self.results[self.result_index];
            while batch.len() < self.batch_size && self.row_index < result.nodes.len() {
                batch.push(&result.nodes[self.row_index]);
                self.row_index += 1;
            }
            if self.row_index >= result.nodes.len() {
                self.result_index += 1;
                self.row_index = 0;
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

impl<'a> Iterator for TableProducer<'a> {
    type Item = RowBatch;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

/// A node row shaped for the scalar variant's `nodes: LIST(node_record)`
/// column — identical field semantics to `RowBatch`, but row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub node_id: u64,
    pub type_raw: String,
    pub name: Option<String>,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub parent_id: Option<i64>,
    pub depth: u32,
    pub sibling_index: u32,
    pub children_count: u32,
    pub descendant_count: u32,
    pub peek: Option<String>,
    pub semantic_type: u8,
    pub universal_flags: u8,
    pub arity_bin: u8,
    pub native: Option<NativeContext>,
}

impl From<&ASTNode> for NodeRecord {
    fn from(node: &ASTNode) -> Self {
        NodeRecord {
            node_id: node.node_id,
            type_raw: node.type_raw.clone(),
            name: node.name.clone().filter(|s| !s.is_empty()),
            start_line: node.start_line,
            start_column: node.start_column,
            end_line: node.end_line,
            end_column: node.end_column,
            parent_id: if node.parent_id < 0 { None } else { Some(node.parent_id) },
            depth: node.depth,
            sibling_index: node.sibling_index,
            children_count: node.children_count,
            descendant_count: node.descendant_count,
            peek: node.peek.clone().filter(|s| !s.is_empty()),
            semantic_type: node.semantic_type,
            universal_flags: node.universal_flags,
            arity_bin: node.arity_bin,
            native: node.native.clone(),
        }
    }
}

/// `{source: {file_path, language}, nodes: LIST(node_record)}` — one value
/// per parsed file, for callers that want a single column of ASTs.
#[derive(Clone, Debug, PartialEq)]
pub struct FileAstRecord {
    pub file_path: String,
    pub language: String,
    pub nodes: Vec<NodeRecord>,
}

pub fn to_scalar_records(results: &[ASTResult]) -> Vec<FileAstRecord> {
    results
        .iter()
        .map(|result| FileAstRecord {
            file_path: result.source.file_path.clone(),
            language: result.source.language.clone(),
            nodes: result.nodes.iter().map(NodeRecord::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::AdapterRegistry;

    fn sample_results() -> Vec<ASTResult> {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let a = crate::engine::parse_source(adapter.as_ref(), "x = 1\n", "a.py", Default::default()).unwrap();
        let b = crate::engine::parse_source(adapter.as_ref(), "y = 2\nz = 3\n", "b.py", Default::default()).unwrap();
        vec![a, b]
    }

    #[test]
    fn batches_respect_batch_size() {
        let results = sample_results();
        let total_nodes: usize = results.iter().map(|r| r.nodes.len()).sum();
        let mut producer = TableProducer::new(&results, 2);
        let mut seen = 0;
        while let Some(batch) = producer.next_batch() {
            assert!(batch.len() <= 2);
            seen += batch.len();
        }
        assert_eq!(seen, total_nodes);
    }

    #[test]
    fn root_node_parent_id_is_null() {
        let results = sample_results();
        let mut producer = TableProducer::new(&results, 100);
        let batch = producer.next_batch().unwrap();
        assert_eq!(batch.parent_id[0], None);
    }

    #[test]
    fn empty_name_becomes_null() {
        let results = sample_results();
        let mut producer = TableProducer::new(&results, 100);
        let batch = producer.next_batch().unwrap();
        for (name, node_id) in batch.name.iter().zip(batch.node_id.iter()) {
            if name.as_deref() == Some("") {
                panic!("empty name should have been nulled for node {node_id}");
            }
        }
    }

    #[test]
    fn iterator_exhausts_after_all_results_drained() {
        let results = sample_results();
        let producer = TableProducer::new(&results, 4);
        let batches: Vec<RowBatch> = producer.collect();
        let total: usize = batches.iter().map(|b| b.len()).sum();
        let expected: usize = results.iter().map(|r| r.nodes.len()).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn scalar_records_preserve_per_file_node_order() {
        let results = sample_results();
        let records = to_scalar_records(&results);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_path, "a.py");
        assert_eq!(records[1].file_path, "b.py");
        for (record, result) in records.iter().zip(results.iter()) {
            assert_eq!(record.nodes.len(), result.nodes.len());
        }
    }
}
