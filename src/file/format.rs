use num_enum::{FromPrimitive, IntoPrimitive};

#[doc = r#"
The format word of the `MThd` header.

Loading and saving treat every format alike; the value is copied from and
to the header as is, including words above 2 which are kept as
[`FormatType::Other`]. It only matters to
[`MidiFile::one_track_per_voice`](super::MidiFile::one_track_per_voice),
which converts format 0 files.

# Example
```rust
# use smfile::prelude::*;
assert_eq!(FormatType::from(2u16), FormatType::SequentiallyIndependent);
assert_eq!(FormatType::from(7u16), FormatType::Other(7));
assert_eq!(u16::from(FormatType::Other(7)), 7);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: a single multi-channel track
    SingleMultiChannel = 0,
    /// Format 1: simultaneous tracks sharing the tempo map of track 0
    Simultaneous = 1,
    /// Format 2: independent single-track sequences
    SequentiallyIndependent = 2,
    /// Any other format word
    #[num_enum(catch_all)]
    Other(u16),
}

impl Default for FormatType {
    fn default() -> Self {
        Self::Simultaneous
    }
}

#[test]
fn format_from_header_word() {
    assert_eq!(FormatType::from(0u16), FormatType::SingleMultiChannel);
    assert_eq!(FormatType::from(2u16), FormatType::SequentiallyIndependent);
    assert_eq!(FormatType::from(3u16), FormatType::Other(3));
    assert_eq!(u16::from(FormatType::Simultaneous), 1);
    assert_eq!(u16::from(FormatType::Other(0xFFFF)), 0xFFFF);
}
