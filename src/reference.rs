// SPDX-License-Identifier: Apache-2.0

//! Reference tables: on-disk format and sources.
//!
//! Reference tables are authored independently of the generators and are
//! the oracle the generated tables are checked against. They are stored as
//! JSON, one file per scale named `hq<zoom>x.json`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hq_error::HqError;
use crate::pixel_expr::{PixelExpr, PixelExprTable, Scale, get_zoom};

const REFERENCE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported reference table version {got}")]
    UnsupportedVersion { got: u32 },

    #[error("invalid reference table: {0}")]
    Invalid(#[from] HqError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelExprTableOnDisk {
    pub version: u32,
    pub zoom: usize,
    /// One entry per case; each lists the 9-entry weights of every sub-pixel.
    pub pixel_expr: Vec<PixelExpr>,
}

impl From<&PixelExprTable> for PixelExprTableOnDisk {
    fn from(table: &PixelExprTable) -> Self {
        Self {
            version: REFERENCE_VERSION,
            zoom: table.zoom(),
            pixel_expr: table.exprs().to_vec(),
        }
    }
}

impl TryFrom<PixelExprTableOnDisk> for PixelExprTable {
    type Error = LoadError;

    fn try_from(on_disk: PixelExprTableOnDisk) -> Result<Self, LoadError> {
        if on_disk.version != REFERENCE_VERSION {
            return Err(LoadError::UnsupportedVersion {
                got: on_disk.version,
            });
        }
        let inferred = get_zoom(&on_disk.pixel_expr)?;
        if inferred != on_disk.zoom {
            return Err(HqError::ZoomMismatch {
                lhs: on_disk.zoom,
                rhs: inferred,
            }
            .into());
        }
        Ok(PixelExprTable::new(on_disk.zoom, on_disk.pixel_expr)?)
    }
}

pub fn read_table(r: impl io::Read) -> Result<PixelExprTable, LoadError> {
    let on_disk: PixelExprTableOnDisk = serde_json::from_reader(r)?;
    on_disk.try_into()
}

pub fn write_table(w: impl io::Write, table: &PixelExprTable) -> Result<(), LoadError> {
    serde_json::to_writer(w, &PixelExprTableOnDisk::from(table))?;
    Ok(())
}

pub fn load_table(path: &Path) -> Result<PixelExprTable, LoadError> {
    let file = File::open(path)?;
    read_table(BufReader::new(file))
}

pub fn save_table(path: &Path, table: &PixelExprTable) -> Result<(), LoadError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_table(&mut w, table)?;
    w.flush()?;
    Ok(())
}

/// File name of the table for `scale` inside `dir`.
pub fn reference_path(dir: &Path, scale: Scale) -> PathBuf {
    dir.join(format!("hq{}x.json", scale.zoom()))
}

/// Provides the trusted full table for a scale, when one is available.
pub trait ReferenceSource {
    fn reference(&self, scale: Scale) -> Result<Option<PixelExprTable>, LoadError>;
}

/// Reads `hq<zoom>x.json` files from a directory; absent files yield `None`.
#[derive(Debug, Clone)]
pub struct DirReferenceSource {
    dir: PathBuf,
}

impl DirReferenceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReferenceSource for DirReferenceSource {
    fn reference(&self, scale: Scale) -> Result<Option<PixelExprTable>, LoadError> {
        let path = reference_path(&self.dir, scale);
        if !path.exists() {
            log::debug!("no reference table at {}", path.display());
            return Ok(None);
        }
        log::info!("loading {} reference table from {}", scale, path.display());
        load_table(&path).map(Some)
    }
}

impl ReferenceSource for BTreeMap<Scale, PixelExprTable> {
    fn reference(&self, scale: Scale) -> Result<Option<PixelExprTable>, LoadError> {
        Ok(self.get(&scale).cloned())
    }
}
