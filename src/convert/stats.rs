//! Corpus statistics.

use serde::Serialize;

use crate::model::PageData;

/// Aggregate counts over a parsed corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusStats {
    /// Parsed pages
    pub total_pages: usize,

    /// Regions over all pages
    pub total_regions: usize,

    /// Lines over all regions
    pub total_lines: usize,

    /// Distinct project names, first-seen order
    pub projects: Vec<String>,

    /// Regions per page (0 for an empty corpus)
    pub avg_regions_per_page: f64,

    /// Lines per page (0 for an empty corpus)
    pub avg_lines_per_page: f64,
}

impl CorpusStats {
    /// Compute statistics for a page collection.
    pub fn from_pages(pages: &[PageData]) -> Self {
        let mut stats = Self {
            total_pages: pages.len(),
            ..Default::default()
        };

        for page in pages {
            stats.total_regions += page.region_count();
            stats.total_lines += page.line_count();
            if !stats.projects.contains(&page.project_name) {
                stats.projects.push(page.project_name.clone());
            }
        }

        if stats.total_pages > 0 {
            let pages = stats.total_pages as f64;
            stats.avg_regions_per_page = stats.total_regions as f64 / pages;
            stats.avg_lines_per_page = stats.total_lines as f64 / pages;
        }
        stats
    }
}

impl std::fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dataset Statistics:")?;
        writeln!(f, "  Total pages: {}", self.total_pages)?;
        writeln!(f, "  Total regions: {}", self.total_regions)?;
        writeln!(f, "  Total lines: {}", self.total_lines)?;
        writeln!(f, "  Projects: {}", self.projects.join(", "))?;
        writeln!(f, "  Avg regions per page: {:.2}", self.avg_regions_per_page)?;
        writeln!(f, "  Avg lines per page: {:.2}", self.avg_lines_per_page)
    }
}
