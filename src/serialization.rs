use std::io::Write;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::errors::{InterpolationError, Result};
use crate::grids::rectilinear_grid::RectilinearGrid;
use crate::interpolator::{Interpolator, InterpolatorOptions};

///
/// Serialized form of an [`Interpolator`]: the grid, the value tensor as a
/// shape plus row-major data, and the options. Spline coefficients are
/// rebuilt on load.
///
#[derive(Serialize, Deserialize)]
struct InterpolatorData
{
    grid: RectilinearGrid,
    shape: Vec<usize>,
    values: Vec<f64>,
    options: InterpolatorOptions,
}

impl Interpolator
{
    ///
    /// Encode the interpolator (bincode, compressed using LZ4).
    ///
    pub fn to_bytes(&self) -> Result<Vec<u8>>
    {
        let data = InterpolatorData
        {
            grid: self.grid().clone(),
            shape: self.values().array().shape().to_vec(),
            values: self.values().flat().to_vec(),
            options: self.options(),
        };
        let bytes = bincode::serde::encode_to_vec(&data, bincode::config::standard())
            .map_err(|e| InterpolationError::Serialization(e.to_string()))?;
        Ok(lz4_flex::compress_prepend_size(&bytes))
    }

    ///
    /// Decode a buffer written by [`Interpolator::to_bytes`]. The contents are
    /// validated the same way as a freshly constructed interpolator.
    ///
    pub fn from_bytes(buffer: &[u8]) -> Result<Self>
    {
        let buffer = lz4_flex::decompress_size_prepended(buffer).map_err(|_| InterpolationError::Decompression)?;
        let (data, _): (InterpolatorData, usize) = bincode::serde::decode_from_slice(&buffer, bincode::config::standard())
            .map_err(|e| InterpolationError::Deserialization(e.to_string()))?;
        let values = ArrayD::from_shape_vec(IxDyn(&data.shape), data.values)
            .map_err(|e| InterpolationError::InvalidShape(e.to_string()))?;
        Interpolator::with_options(data.grid, values, data.options)
    }

    pub fn write<Writer: Write>(&self, mut writer: Writer) -> Result<()>
    {
        let buffer = self.to_bytes()?;
        writer.write_all(&buffer).map_err(|e| InterpolationError::Io(e.to_string()))
    }

    pub fn read<Reader: std::io::Read>(mut reader: Reader) -> Result<Self>
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| InterpolationError::Io(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

#[test]
fn check_bytes_round_trip()
{
    use crate::method::Method;
    use ndarray::Array3;
    let values = Array3::from_shape_fn((4, 5, 2), |(i, j, b)| (i * j) as f64 + b as f64 * 0.5);
    let grid = vec![vec![0.0, 1.0, 2.5, 3.0], vec![0.0, 0.5, 1.0, 1.5, 4.0]];
    let interpolator = Interpolator::new(grid, values, Method::Cubic, false, None).unwrap();
    let restored = Interpolator::from_bytes(&interpolator.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.options(), interpolator.options());
    assert_eq!(restored.grid(), interpolator.grid());
    let x = [1.7, 3.2];
    assert_eq!(restored.interpolate_point(&x).unwrap(), interpolator.interpolate_point(&x).unwrap());
}

#[test]
fn check_write_and_read()
{
    use ndarray::Array1;
    let interpolator = Interpolator::new(vec![vec![0.0, 1.0, 2.0]], Array1::from(vec![1.0, 3.0, 2.0]), Default::default(), true, Some(f64::NAN)).unwrap();
    let mut buffer = Vec::new();
    interpolator.write(&mut buffer).unwrap();
    let restored = Interpolator::read(buffer.as_slice()).unwrap();
    assert_eq!(restored.interpolate_point(&[0.5]).unwrap(), vec![2.0]);
    assert!(restored.fill_value().is_some_and(f64::is_nan));
}

#[test]
fn check_corrupt_buffer()
{
    assert_eq!(Interpolator::from_bytes(&[1, 2, 3]).unwrap_err(), InterpolationError::Decompression);
}
