use std::collections::BTreeMap;

use crate::IngestReport;

/// Log the end-of-run summary: counts, then one line per skip and failure.
/// Call once after the run; per-file lines were already logged as they happened, these repeat
/// them at debug so a verbose log ends with the full list.
pub fn log_run_summary(report: &IngestReport) {
    if report.is_empty_source() {
        log::warn!("{}", report.message());
        return;
    }
    log::info!(
        "Processed {} files: {} copied, {} failed, {} skipped, {} unclassified, {} outside date filter",
        report.total_discovered,
        report.copied(),
        report.failed(),
        report.skipped.len(),
        report.unclassified,
        report.filtered_out
    );

    let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for e in report
        .skipped
        .iter()
        .map(|s| &s.error)
        .chain(report.outcomes.iter().filter_map(|o| o.error.as_ref()))
    {
        *by_kind.entry(e.kind()).or_default() += 1;
    }
    if !by_kind.is_empty() {
        let parts: Vec<String> = by_kind.iter().map(|(k, n)| format!("{k}={n}")).collect();
        log::warn!("Problems by kind: {}", parts.join(" "));
    }

    for s in &report.skipped {
        match &s.attempted {
            Some(dest) => log::debug!("  skipped: {} -> {}: {}", s.path.display(), dest.display(), s.error),
            None => log::debug!("  skipped: {}: {}", s.path.display(), s.error),
        }
    }
    for o in report.outcomes.iter().filter(|o| !o.is_copied()) {
        if let Some(e) = &o.error {
            log::debug!("  failed: {}", e);
        }
    }
}
