pub(crate) mod classic_pixel;
pub(crate) mod engine;
pub(crate) mod faith;
pub(crate) mod glitch;
pub(crate) mod legacy_edge;
pub(crate) mod registry;
pub(crate) mod spec;
