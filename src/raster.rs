//! Raster value lookup
//!
//! The aggregator only needs [`RasterLookup`]; [`GridRaster`] and
//! [`RasterSet`] are an in-memory implementation used by the server binary.
//! Grid values are little-endian f32, supplied either inline as base64 or as
//! a raw file next to the configuration.

use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use byteorder::{ByteOrder, LittleEndian};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of raster values for the aggregator.
///
/// Returns `Ok(None)` when there is no data at the location. Errors are
/// propagated to the caller unchanged. Implementations must be safe to call
/// from several threads at once.
pub trait RasterLookup: Sync {
    fn lookup(&self, layer_id: &str, x: f64, y: f64) -> anyhow::Result<Option<f64>>;
}

impl<F> RasterLookup for F
where
    F: Fn(&str, f64, f64) -> anyhow::Result<Option<f64>> + Sync,
{
    fn lookup(&self, layer_id: &str, x: f64, y: f64) -> anyhow::Result<Option<f64>> {
        self(layer_id, x, y)
    }
}

/// North-up raster grid anchored at its top-left corner
#[derive(Debug, Clone)]
pub struct GridRaster {
    pub origin: [f64; 2],
    pub cell_size: f64,
    pub width: usize,
    pub height: usize,
    pub nodata: Option<f64>,
    values: Vec<f32>,
}

impl GridRaster {
    pub fn new(
        origin: [f64; 2],
        cell_size: f64,
        width: usize,
        height: usize,
        nodata: Option<f64>,
        values: Vec<f32>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            cell_size > 0.0 && cell_size.is_finite(),
            "raster cell size must be positive, got {}",
            cell_size
        );
        anyhow::ensure!(
            values.len() == width * height,
            "raster has {} values, expected {}x{}",
            values.len(),
            width,
            height
        );
        Ok(Self {
            origin,
            cell_size,
            width,
            height,
            nodata,
            values,
        })
    }

    /// Decode a buffer of little-endian f32 values
    pub fn from_le_bytes(
        origin: [f64; 2],
        cell_size: f64,
        width: usize,
        height: usize,
        nodata: Option<f64>,
        bytes: &[u8],
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            bytes.len() % 4 == 0,
            "raster data length {} is not a multiple of 4",
            bytes.len()
        );
        let mut values = vec![0f32; bytes.len() / 4];
        LittleEndian::read_f32_into(bytes, &mut values);
        Self::new(origin, cell_size, width, height, nodata, values)
    }

    /// Value of the cell containing `(x, y)`, or `None` outside the grid or on nodata
    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let col = ((x - self.origin[0]) / self.cell_size).floor();
        let row = ((self.origin[1] - y) / self.cell_size).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }

        let value = self.values[row * self.width + col] as f64;
        if value.is_nan() || self.nodata == Some(value) {
            return None;
        }
        Some(value)
    }
}

/// Where a layer's grid comes from, as written in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct RasterSource {
    pub origin: [f64; 2],
    pub cell_size: f64,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub nodata: Option<f64>,
    /// Base64 of the little-endian f32 values, row by row from the top
    #[serde(default)]
    pub data: Option<String>,
    /// Raw little-endian f32 file, relative to the configuration file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl RasterSource {
    pub fn load(&self, base_dir: &Path) -> anyhow::Result<GridRaster> {
        let bytes = match (&self.data, &self.path) {
            (Some(data), _) => general_purpose::STANDARD
                .decode(data.trim())
                .context("Failed to decode base64 raster data")?,
            (None, Some(path)) => {
                let full = base_dir.join(path);
                std::fs::read(&full)
                    .with_context(|| format!("Failed to read raster file {}", full.display()))?
            }
            (None, None) => anyhow::bail!("raster source needs either 'data' or 'path'"),
        };
        GridRaster::from_le_bytes(
            self.origin,
            self.cell_size,
            self.width,
            self.height,
            self.nodata,
            &bytes,
        )
    }
}

/// Grids keyed by layer id
#[derive(Debug, Clone, Default)]
pub struct RasterSet {
    rasters: HashMap<String, GridRaster>,
}

impl RasterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer_id: impl Into<String>, raster: GridRaster) {
        self.rasters.insert(layer_id.into(), raster);
    }

    pub fn get(&self, layer_id: &str) -> Option<&GridRaster> {
        self.rasters.get(layer_id)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}

impl RasterLookup for RasterSet {
    fn lookup(&self, layer_id: &str, x: f64, y: f64) -> anyhow::Result<Option<f64>> {
        let raster = self
            .rasters
            .get(layer_id)
            .with_context(|| format!("No raster loaded for layer {}", layer_id))?;
        Ok(raster.value_at(x, y))
    }
}
