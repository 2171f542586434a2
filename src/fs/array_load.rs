use std::path::Path;

use tracing::debug;

use crate::{error::LoadError, numerics::AlignedBlock};

pub trait Operands: Sized {
    /// Parses an in-memory `.npy` payload holding a 1-D `f32` array.
    fn from_npy_bytes(bytes: &[u8]) -> Result<Self, LoadError>;

    fn load_from_npy(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read npy file");
        Self::from_npy_bytes(&bytes)
    }
}

impl Operands for Vec<f32> {
    fn from_npy_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        // reading from memory cannot fail, so every error below is a malformed payload
        let npy = npyz::NpyFile::new(bytes).map_err(|e| LoadError::Npy(e.to_string()))?;
        let shape = npy.shape().to_vec();
        if shape.len() != 1 {
            return Err(LoadError::Shape {
                expected: "a one-dimensional array",
                found: shape,
            });
        }

        let iter = npy
            .data::<f32>()
            .map_err(|e| LoadError::Npy(e.to_string()))?;
        let mut result = Vec::with_capacity(shape[0] as usize);
        for entry in iter {
            result.push(entry.map_err(|e| LoadError::Npy(e.to_string()))?);
        }
        if result.len() as u64 != shape[0] {
            return Err(LoadError::Npy(format!(
                "header promises {} values, payload holds {}",
                shape[0],
                result.len()
            )));
        }
        Ok(result)
    }
}

/// Zero-padded to a whole number of blocks.
impl Operands for Vec<AlignedBlock> {
    fn from_npy_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        Vec::<f32>::from_npy_bytes(bytes).map(AlignedBlock::allocate_padded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::SIMD_LANECOUNT;

    /// Builds a version 1.0 `.npy` payload for little-endian f32 data.
    fn npy_bytes(shape: &str, data: &[f32]) -> Vec<u8> {
        let mut header =
            format!("{{'descr': '<f4', 'fortran_order': False, 'shape': {shape}, }}");
        // magic + version + header length + header + '\n' must land on a 64-byte boundary
        let unpadded = 10 + header.len() + 1;
        header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
        header.push('\n');

        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for v in data {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_load_flat_array() {
        let data = [0.5, -1.0, 2.25, 8.0, 1e-3];
        let loaded = Vec::<f32>::from_npy_bytes(&npy_bytes("(5,)", &data)).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_load_empty_array() {
        let loaded = Vec::<f32>::from_npy_bytes(&npy_bytes("(0,)", &[])).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_blocks_pads_last_block() {
        let data: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let blocks = Vec::<AlignedBlock>::from_npy_bytes(&npy_bytes("(20,)", &data)).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].data[..4], [16.0, 17.0, 18.0, 19.0]);
        assert_eq!(blocks[1].data[4..], [0.0; SIMD_LANECOUNT - 4]);
    }

    #[test]
    fn test_rejects_two_dimensional_array() {
        let err = Vec::<f32>::from_npy_bytes(&npy_bytes("(2, 2)", &[1.0; 4])).unwrap_err();
        match err {
            LoadError::Shape { found, .. } => assert_eq!(found, vec![2, 2]),
            other => panic!("expected a shape error, got {other}"),
        }
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Vec::<f32>::from_npy_bytes(b"definitely not numpy").unwrap_err();
        assert!(matches!(err, LoadError::Npy(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_truncated_data() {
        let bytes = npy_bytes("(4,)", &[1.0; 4]);
        let err = Vec::<f32>::from_npy_bytes(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(err, LoadError::Npy(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_truncated_header() {
        let bytes = npy_bytes("(4,)", &[1.0; 4]);
        let err = Vec::<f32>::from_npy_bytes(&bytes[..20]).unwrap_err();
        assert!(matches!(err, LoadError::Npy(_)), "got {err:?}");
    }

    #[test]
    fn test_load_from_path() {
        let data = [3.0, 4.0, 5.0];
        let path = std::env::temp_dir().join(format!("lanewise-{}.npy", std::process::id()));
        std::fs::write(&path, npy_bytes("(3,)", &data)).unwrap();

        let loaded = Vec::<f32>::load_from_npy(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), data);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Vec::<f32>::load_from_npy("/nonexistent/operand.npy").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
