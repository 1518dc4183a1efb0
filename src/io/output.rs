//! # Dendrogram Writers
//!
//! - `Json`: the full result (heights, positional merges, leaf order) plus
//!   the stable-id linkage rows.
//! - `Newick`: the tree only, one line.
//! - `Tsv`: one merge per line (`height`, `merge_a`, `merge_b`), then a
//!   `leaf_order` line.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Dendrogram, LinkageRow};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Newick,
    Tsv,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    dendrogram: &'a Dendrogram,
    linkage: Vec<LinkageRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
}

/// Write `dendrogram` in the requested format
pub fn write_dendrogram<W: Write>(
    mut writer: W,
    dendrogram: &Dendrogram,
    format: OutputFormat,
    labels: Option<&[String]>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = JsonReport {
                dendrogram,
                linkage: dendrogram.linkage_matrix(),
                labels,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Newick => {
            writeln!(writer, "{}", dendrogram.to_newick(labels))?;
        }
        OutputFormat::Tsv => {
            writeln!(writer, "height\tmerge_a\tmerge_b")?;
            for merge in dendrogram.merges() {
                writeln!(writer, "{}\t{}\t{}", merge.height, merge.a, merge.b)?;
            }
            let leaves: Vec<String> = dendrogram
                .leaf_order()
                .iter()
                .map(|&s| match labels.and_then(|l| l.get(s.as_usize())) {
                    Some(label) => label.clone(),
                    None => s.0.to_string(),
                })
                .collect();
            writeln!(writer, "leaf_order\t{}", leaves.join("\t"))?;
        }
    }
    writer.flush()?;
    Ok(())
}
