//! Reader for dlib's serialized `shape_predictor` files.
//!
//! Accepts the plain `.dat` file and its bzip2-compressed `.dat.bz2` form.
//!
//! Encoding:
//! - integers: control byte (bit 7 = sign, low nibble = byte count) followed
//!   by the little-endian magnitude
//! - floats: `(mantissa, exponent)` integer pair, value = mantissa · 2^exponent
//! - column matrices: `(-rows, -cols, values...)`
//! - vectors: `(len, items...)`
//!
//! File layout: version (1), initial shape, forests, anchor indices, deltas.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use thiserror::Error;

use super::ert_shape_predictor::{RegressionTree, ShapeModel, Split};

/// Cap on speculative preallocation so a corrupt length can't exhaust memory.
const MAX_PREALLOC: usize = 4096;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Unable to open {} for reading.", path.display())]
    Missing { path: PathBuf },
    #[error("{} is not a valid shape predictor model: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ModelLoadError {
    /// Missing or undecodable model file, as opposed to an incidental I/O failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::Corrupt { .. })
    }
}

/// Failure while decoding a model stream.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Load a shape model from disk, decompressing `.bz2` files on the fly.
pub fn load_shape_model(path: &Path) -> Result<ShapeModel, ModelLoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ModelLoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => ModelLoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let reader = BufReader::new(file);

    let is_bz2 = path.extension().is_some_and(|ext| ext == "bz2");
    log::debug!("Loading shape model {} (bz2: {is_bz2})", path.display());
    let result = if is_bz2 {
        read_shape_model(BzDecoder::new(reader))
    } else {
        read_shape_model(reader)
    };

    result.map_err(|e| match e {
        FormatError::Io(source) if !is_decode_failure(&source) => ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        FormatError::Io(source) => ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: source.to_string(),
        },
        FormatError::Invalid(reason) => ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            reason,
        },
    })
}

/// Truncated or malformed streams (including bad bzip2 data) surface as
/// these I/O kinds.
fn is_decode_failure(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput
    )
}

/// Decode a shape model from an uncompressed stream.
pub fn read_shape_model<R: Read>(reader: R) -> Result<ShapeModel, FormatError> {
    let mut r = DlibReader::new(reader);

    let version = r.read_int()?;
    if version != 1 {
        return Err(invalid(format!("unsupported shape_predictor version {version}")));
    }

    let initial_shape = r.read_shape()?;
    let num_parts = initial_shape.len();
    if num_parts == 0 {
        return Err(invalid("initial shape has no parts"));
    }

    let num_cascades = r.read_len()?;
    let mut forests = Vec::with_capacity(num_cascades.min(MAX_PREALLOC));
    for _ in 0..num_cascades {
        let num_trees = r.read_len()?;
        let mut trees = Vec::with_capacity(num_trees.min(MAX_PREALLOC));
        for _ in 0..num_trees {
            trees.push(r.read_tree(num_parts)?);
        }
        forests.push(trees);
    }

    let num_anchor_sets = r.read_len()?;
    let mut anchor_idx = Vec::with_capacity(num_anchor_sets.min(MAX_PREALLOC));
    for _ in 0..num_anchor_sets {
        let n = r.read_len()?;
        let mut anchors = Vec::with_capacity(n.min(MAX_PREALLOC));
        for _ in 0..n {
            anchors.push(r.read_len()?);
        }
        anchor_idx.push(anchors);
    }

    let num_delta_sets = r.read_len()?;
    let mut deltas = Vec::with_capacity(num_delta_sets.min(MAX_PREALLOC));
    for _ in 0..num_delta_sets {
        let n = r.read_len()?;
        let mut set = Vec::with_capacity(n.min(MAX_PREALLOC));
        for _ in 0..n {
            let dx = r.read_float()?;
            let dy = r.read_float()?;
            set.push((dx, dy));
        }
        deltas.push(set);
    }

    let model = ShapeModel {
        initial_shape,
        forests,
        anchor_idx,
        deltas,
    };
    validate(&model)?;
    log::debug!(
        "Shape model: {} parts, {} cascades",
        model.num_parts(),
        model.forests.len()
    );
    Ok(model)
}

/// Cross-checks that every index the evaluator will follow is in bounds.
fn validate(model: &ShapeModel) -> Result<(), FormatError> {
    let cascades = model.forests.len();
    if model.anchor_idx.len() != cascades || model.deltas.len() != cascades {
        return Err(invalid(format!(
            "{cascades} cascades but {} anchor sets and {} delta sets",
            model.anchor_idx.len(),
            model.deltas.len()
        )));
    }
    for (c, (anchors, deltas)) in model.anchor_idx.iter().zip(&model.deltas).enumerate() {
        if anchors.len() != deltas.len() {
            return Err(invalid(format!(
                "cascade {c}: {} anchors but {} deltas",
                anchors.len(),
                deltas.len()
            )));
        }
        if let Some(&bad) = anchors.iter().find(|&&a| a >= model.num_parts()) {
            return Err(invalid(format!("cascade {c}: anchor {bad} out of range")));
        }
        for tree in &model.forests[c] {
            for split in &tree.splits {
                if split.idx1 >= anchors.len() || split.idx2 >= anchors.len() {
                    return Err(invalid(format!(
                        "cascade {c}: split feature ({}, {}) out of range",
                        split.idx1, split.idx2
                    )));
                }
            }
        }
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> FormatError {
    FormatError::Invalid(reason.into())
}

struct DlibReader<R: Read> {
    reader: R,
}

impl<R: Read> DlibReader<R> {
    fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_byte(&mut self) -> Result<u8, FormatError> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_int(&mut self) -> Result<i64, FormatError> {
        let control = self.read_byte()?;
        let negative = control & 0x80 != 0;
        let num_bytes = (control & 0x0F) as usize;
        if num_bytes > 8 {
            return Err(invalid(format!("integer of {num_bytes} bytes")));
        }

        let mut magnitude: u64 = 0;
        for i in 0..num_bytes {
            magnitude |= (self.read_byte()? as u64) << (8 * i);
        }
        let value = magnitude as i64;
        Ok(if negative { value.wrapping_neg() } else { value })
    }

    /// Non-negative integer used as a count or index.
    fn read_len(&mut self) -> Result<usize, FormatError> {
        let value = self.read_int()?;
        usize::try_from(value).map_err(|_| invalid(format!("expected unsigned value, got {value}")))
    }

    fn read_float(&mut self) -> Result<f32, FormatError> {
        let mantissa = self.read_int()?;
        let exponent = self.read_int()?;
        if mantissa == 0 {
            return Ok(0.0);
        }
        let exponent = i32::try_from(exponent)
            .map_err(|_| invalid(format!("float exponent {exponent} out of range")))?;
        Ok((mantissa as f64 * 2f64.powi(exponent)) as f32)
    }

    /// Column matrix of interleaved `x, y` values.
    fn read_shape(&mut self) -> Result<Vec<(f32, f32)>, FormatError> {
        let rows = self.read_int()?;
        let cols = self.read_int()?;
        // Dimensions are stored negated.
        let (rows, cols) = (rows.wrapping_neg(), cols.wrapping_neg());
        if cols != 1 || rows < 0 || rows % 2 != 0 {
            return Err(invalid(format!("invalid shape matrix {rows}x{cols}")));
        }
        let n = rows as usize / 2;
        let mut points = Vec::with_capacity(n.min(MAX_PREALLOC));
        for _ in 0..n {
            let x = self.read_float()?;
            let y = self.read_float()?;
            points.push((x, y));
        }
        Ok(points)
    }

    fn read_tree(&mut self, num_parts: usize) -> Result<RegressionTree, FormatError> {
        let num_splits = self.read_len()?;
        let mut splits = Vec::with_capacity(num_splits.min(MAX_PREALLOC));
        for _ in 0..num_splits {
            let idx1 = self.read_len()?;
            let idx2 = self.read_len()?;
            let thresh = self.read_float()?;
            splits.push(Split { idx1, idx2, thresh });
        }

        let num_leaves = self.read_len()?;
        if num_leaves != num_splits + 1 {
            return Err(invalid(format!(
                "tree with {num_splits} splits has {num_leaves} leaves"
            )));
        }
        let mut leaf_values = Vec::with_capacity(num_leaves.min(MAX_PREALLOC));
        for _ in 0..num_leaves {
            let leaf = self.read_shape()?;
            if leaf.len() != num_parts {
                return Err(invalid(format!(
                    "leaf has {} parts, expected {num_parts}",
                    leaf.len()
                )));
            }
            leaf_values.push(leaf);
        }
        Ok(RegressionTree {
            splits,
            leaf_values,
        })
    }
}
