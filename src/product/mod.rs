pub mod carousel;
pub mod page;
pub mod projector;

pub use carousel::ImageCarousel;
pub use page::{ProductPage, ProductView};
pub use projector::{KNOWN_FIELDS, extra_attributes, humanize_key};
