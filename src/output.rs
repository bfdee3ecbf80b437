use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, instrument};

use crate::error::{Result, RosterError};
use crate::model::RosterSnapshot;

/// Write `snapshot` to `path` as pretty-printed JSON, replacing any previous
/// file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_snapshot(path: &Path, snapshot: &RosterSnapshot) -> Result<()> {
    let io_err = |source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush().map_err(io_err)?;

    info!("snapshot saved");
    Ok(())
}
