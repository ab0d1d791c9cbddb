//! # Codec Candidate Descriptors
//!
//! Decode engines are configured with an `avc1.PPCCLL` descriptor string:
//! profile IDC, constraint flags and level IDC, each as two hex digits
//! (`avc1.42001E` is Baseline, no constraints, level 3.0). Engine support
//! varies per platform and is not discoverable up front, so we generate a
//! ranked list of plausible descriptors and let negotiation try them in
//! order (see `engine::DecoderEngine::negotiate`).

use once_cell::sync::Lazy;
use std::fmt;

/// H.264 profile IDCs, in Chromium constant order to aid googling:
/// BASELINE, MAIN, SCALABLEBASELINE, SCALABLEHIGH, EXTENDED, HIGH,
/// HIGH10PROFILE, MULTIVIEWHIGH, HIGH422PROFILE, STEREOHIGH,
/// HIGH444PREDICTIVEPROFILE.
pub const PROFILE_IDCS: [u8; 11] = [66, 77, 83, 86, 88, 100, 110, 118, 122, 128, 244];

/// Compatibility levels tried per profile: 3.0 and 4.0.
pub const LEVEL_IDCS: [u8; 2] = [30, 40];

/// Constraint flag byte. The bottom three bits are reserved and must stay
/// zero or engines reject the descriptor outright.
const CONSTRAINT_FLAGS: u8 = 0x00;

/// One candidate codec descriptor to offer a decode engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodecCandidate {
    descriptor: String,
}

impl CodecCandidate {
    pub fn new(profile_idc: u8, constraint_flags: u8, level_idc: u8) -> Self {
        Self {
            descriptor: format!("avc1.{profile_idc:02X}{constraint_flags:02X}{level_idc:02X}"),
        }
    }

    /// The full descriptor string, e.g. `avc1.42001E`.
    pub fn as_str(&self) -> &str {
        &self.descriptor
    }

    /// Profile IDC parsed back out of the descriptor.
    pub fn profile_idc(&self) -> Option<u8> {
        u8::from_str_radix(self.descriptor.get(5..7)?, 16).ok()
    }

    /// Level IDC parsed back out of the descriptor.
    pub fn level_idc(&self) -> Option<u8> {
        u8::from_str_radix(self.descriptor.get(9..11)?, 16).ok()
    }
}

impl fmt::Display for CodecCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

static RANKED: Lazy<Vec<CodecCandidate>> = Lazy::new(|| {
    let mut candidates = Vec::with_capacity(PROFILE_IDCS.len() * LEVEL_IDCS.len());
    for profile in PROFILE_IDCS {
        for level in LEVEL_IDCS {
            candidates.push(CodecCandidate::new(profile, CONSTRAINT_FLAGS, level));
        }
    }
    candidates
});

/// The fixed, deterministic candidate order negotiation walks through.
/// Lower profiles and levels come first; the policy that matters is that
/// every candidate is tried before giving up.
pub fn ranked_candidates() -> &'static [CodecCandidate] {
    &RANKED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_format() {
        let c = CodecCandidate::new(66, 0x00, 30);
        assert_eq!(c.as_str(), "avc1.42001E");
        let c = CodecCandidate::new(100, 0x00, 40);
        assert_eq!(c.as_str(), "avc1.640028");
    }

    #[test]
    fn test_descriptor_parse_back() {
        let c = CodecCandidate::new(77, 0x00, 30);
        assert_eq!(c.profile_idc(), Some(77));
        assert_eq!(c.level_idc(), Some(30));
    }

    #[test]
    fn test_ranked_order_is_deterministic() {
        let ranked = ranked_candidates();
        assert_eq!(ranked.len(), PROFILE_IDCS.len() * LEVEL_IDCS.len());
        assert_eq!(ranked[0].as_str(), "avc1.42001E");
        assert_eq!(ranked[1].as_str(), "avc1.420028");
        assert_eq!(ranked[2].as_str(), "avc1.4D001E");
        assert_eq!(ranked.last().unwrap().as_str(), "avc1.F40028");
    }
}
