use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, warn};

/// Instruction set backing [`F32x16`](super::F32x16) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// 512-bit AVX-512F registers.
    Avx512,
    /// Two 256-bit AVX2 halves per vector.
    Avx2,
    /// Lane-by-lane portable code.
    Scalar,
}

static ACTIVE: OnceLock<Isa> = OnceLock::new();

impl Isa {
    /// Best instruction set the running CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx512f") {
                return Isa::Avx512;
            }
            if std::arch::is_x86_feature_detected!("avx2") {
                return Isa::Avx2;
            }
        }
        Isa::Scalar
    }

    /// Pins the process-wide backend. The first call (or the first vector operation,
    /// whichever happens earlier) wins; later requests are ignored with a warning.
    pub fn init(force_scalar: bool) -> Isa {
        let requested = Self::select(force_scalar);
        let active = *ACTIVE.get_or_init(|| {
            debug!(isa = ?requested, force_scalar, "selected lane backend");
            requested
        });
        if active != requested {
            warn!(
                ?active,
                ?requested,
                "lane backend already selected, ignoring request"
            );
        }
        active
    }

    /// Backend every vector operation dispatches on. A SIMD variant is only ever
    /// returned after the CPU reported the matching feature.
    #[inline]
    pub fn active() -> Isa {
        *ACTIVE.get_or_init(|| {
            let isa = Self::detect();
            debug!(?isa, "selected lane backend");
            isa
        })
    }

    /// Same spelling as the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Isa::Avx512 => "avx512",
            Isa::Avx2 => "avx2",
            Isa::Scalar => "scalar",
        }
    }

    /// Whether the running CPU can execute this backend.
    pub fn is_supported(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => std::arch::is_x86_feature_detected!("avx512f"),
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => std::arch::is_x86_feature_detected!("avx2"),
            Isa::Scalar => true,
            #[cfg(not(target_arch = "x86_64"))]
            _ => false,
        }
    }

    /// Every backend the running CPU can execute, widest first.
    pub fn supported() -> Vec<Isa> {
        [Isa::Avx512, Isa::Avx2, Isa::Scalar]
            .into_iter()
            .filter(|isa| isa.is_supported())
            .collect()
    }

    fn select(force_scalar: bool) -> Isa {
        if force_scalar {
            Isa::Scalar
        } else {
            Self::detect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_picks_widest_supported() {
        assert_eq!(Isa::detect(), Isa::supported()[0]);
        assert!(Isa::detect().is_supported());
    }

    #[test]
    fn test_scalar_always_supported() {
        assert!(Isa::Scalar.is_supported());
        assert_eq!(Isa::supported().last(), Some(&Isa::Scalar));
    }

    #[test]
    fn test_detect_prefers_avx512_over_avx2() {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx512f") {
                assert_eq!(Isa::detect(), Isa::Avx512);
            } else if std::arch::is_x86_feature_detected!("avx2") {
                assert_eq!(Isa::detect(), Isa::Avx2);
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        assert_eq!(Isa::supported(), vec![Isa::Scalar]);
    }

    #[test]
    fn test_active_is_stable() {
        let first = Isa::active();
        assert_eq!(Isa::active(), first);
        // a later request cannot flip the pinned backend
        assert_eq!(Isa::init(true), first);
    }

    #[test]
    fn test_forced_selection_is_scalar() {
        assert_eq!(Isa::select(true), Isa::Scalar);
        assert_eq!(Isa::select(false), Isa::detect());
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Isa::Avx512).unwrap(), "\"avx512\"");
        assert_eq!(serde_json::to_string(&Isa::Scalar).unwrap(), "\"scalar\"");
    }

    #[test]
    fn test_name_matches_serialized_form() {
        for isa in [Isa::Avx512, Isa::Avx2, Isa::Scalar] {
            let serialized = serde_json::to_string(&isa).unwrap();
            assert_eq!(serialized, format!("\"{}\"", isa.name()));
        }
    }
}
