//! Sample rate conversion - linear interpolation over mono buffers

use crate::error::{ConvertError, Result};
use ndarray::{Array1, ArrayView1};

pub struct SampleRateConverter;

impl SampleRateConverter {
    /// Resample a mono buffer to the target rate using linear interpolation.
    /// Returns a copy when the rates already match.
    pub fn resample(
        data: ArrayView1<f32>,
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Array1<f32>> {
        if source_rate == 0 || target_rate == 0 {
            return Err(ConvertError::decode("Sample rate cannot be 0"));
        }

        if source_rate == target_rate {
            return Ok(data.to_owned());
        }

        if data.is_empty() {
            return Err(ConvertError::decode("Input data is empty"));
        }

        let ratio = target_rate as f64 / source_rate as f64;
        let old_length = data.len();
        let new_length = ((old_length as f64) * ratio) as usize;
        let mut new_data = Array1::zeros(new_length);

        for i in 0..new_length {
            let old_pos = i as f64 / ratio;
            let old_index = old_pos.floor() as usize;
            let fraction = old_pos - old_index as f64;

            new_data[i] = if old_index >= old_length - 1 {
                data[old_length - 1]
            } else {
                data[old_index] + (data[old_index + 1] - data[old_index]) * fraction as f32
            };
        }

        Ok(new_data)
    }
}
