pub(crate) mod edges;
pub(crate) mod noise;
pub(crate) mod palette;
pub(crate) mod pixelate;
pub(crate) mod tone;
