//! Writing the scrape document to disk.

use std::path::Path;

use tracing::{debug, info};

use wikiharvest_shared::{Result, ScrapeOutput, WikiHarvestError};

/// Write `output` as pretty-printed JSON followed by a newline.
///
/// Parent directories are created as needed. The document is written to a
/// sibling temp file first and renamed into place, so an interrupted run
/// never leaves a truncated file behind.
pub fn write_output(path: &Path, output: &ScrapeOutput) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WikiHarvestError::io(parent, e))?;
    }

    let mut json = serde_json::to_string_pretty(output)?;
    json.push('\n');

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            WikiHarvestError::validation(format!("output path has no file name: {}", path.display()))
        })?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, &json).map_err(|e| WikiHarvestError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| WikiHarvestError::io(path, e))?;

    debug!(path = %path.display(), bytes = json.len(), "wrote output file");
    info!(
        path = %path.display(),
        items = output.count,
        errors = output.errors.len(),
        "output written"
    );
    Ok(())
}
