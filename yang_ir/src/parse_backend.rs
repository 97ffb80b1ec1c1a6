//! The lexical parser that turns source bytes into a [`pform::ModuleP`] is
//! external (spec §1, §6): `ParseBackend` is the interface the module
//! pipeline calls through. No tokenizer ships in this workspace.

use crate::pform::ModuleP;
use crate::StringDictionary;

/// Format detected from a filename (spec §6: `.yang` -> YANG text, `.yin` -> YIN).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SourceFormat {
    YangText,
    Yin,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yang" => Some(SourceFormat::YangText),
            "yin" => Some(SourceFormat::Yin),
            _ => None,
        }
    }
}

/// `parse(bytes, parser_ctx) -> P-form | error` (spec §6).
pub trait ParseBackend {
    type Error: std::error::Error + 'static;

    /// Parse `data` in `format`, interning every string through `dict`.
    fn parse(
        &self,
        data: &[u8],
        format: SourceFormat,
        dict: &dyn StringDictionary,
    ) -> Result<ModuleP, Self::Error>;
}
