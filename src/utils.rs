use bitflags::bitflags;

bitflags! {
    pub struct ConversionFlags: u32 {
        const NO_FLAG = 0;
        const STRICT_PARENS = 1 << 1;
        const DEBUG = 1 << 2;
    }
}

impl Default for ConversionFlags {
    fn default() -> Self {
        ConversionFlags::STRICT_PARENS
    }
}
