//! EXIF container adapter.
//!
//! Implements the `exifmap-domain` [`TagStore`](exifmap_domain::TagStore) port on top of
//! `kamadak-exif`, which parses JPEG, TIFF, PNG, WebP and HEIF containers. Only primary-image
//! fields (IFD0 and its Exif/GPS sub-IFDs) are exposed; thumbnail fields are dropped at load.

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
mod load;

pub use load::{ContainerError, ExifTag, ExifTagStore, TAG_ALIASES};
