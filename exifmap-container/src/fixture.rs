//! Little-endian TIFF writer for tests.
//!
//! Produces a minimal IFD0 plus Exif sub-IFD, enough for `kamadak-exif` to parse through either
//! [`ExifTagStore::from_raw`](crate::ExifTagStore::from_raw) or a `.tif` file on disk.

/// Tag numbers used by the photo schema.
pub mod tag {
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const EXIF_IFD_POINTER: u16 = 0x8769;
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const F_NUMBER: u16 = 0x829D;
    pub const ISO: u16 = 0x8827;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const PIXEL_X_DIMENSION: u16 = 0xA002;
    pub const PIXEL_Y_DIMENSION: u16 = 0xA003;
    pub const FOCAL_LENGTH_35MM: u16 = 0xA405;
    pub const LENS_MAKE: u16 = 0xA433;
    pub const LENS_MODEL: u16 = 0xA434;
}

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;
const UNDEFINED: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ifd {
    Primary,
    Exif,
}

#[derive(Debug, Clone)]
struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct TiffBuilder {
    primary: Vec<Entry>,
    exif: Vec<Entry>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascii(self, ifd: Ifd, tag: u16, value: &str) -> Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        let count = bytes.len() as u32;
        self.put(ifd, Entry { tag, kind: ASCII, count, bytes })
    }

    pub fn short(self, ifd: Ifd, tag: u16, value: u16) -> Self {
        let bytes = value.to_le_bytes().to_vec();
        self.put(ifd, Entry { tag, kind: SHORT, count: 1, bytes })
    }

    pub fn long(self, ifd: Ifd, tag: u16, value: u32) -> Self {
        let bytes = value.to_le_bytes().to_vec();
        self.put(ifd, Entry { tag, kind: LONG, count: 1, bytes })
    }

    pub fn rational(self, ifd: Ifd, tag: u16, num: u32, den: u32) -> Self {
        let mut bytes = num.to_le_bytes().to_vec();
        bytes.extend_from_slice(&den.to_le_bytes());
        self.put(ifd, Entry { tag, kind: RATIONAL, count: 1, bytes })
    }

    pub fn undefined(self, ifd: Ifd, tag: u16, value: &[u8]) -> Self {
        let count = value.len() as u32;
        let bytes = value.to_vec();
        self.put(ifd, Entry { tag, kind: UNDEFINED, count, bytes })
    }

    pub fn without(mut self, ifd: Ifd, tag: u16) -> Self {
        self.entries(ifd).retain(|e| e.tag != tag);
        self
    }

    /// Serializes to TIFF bytes, header first.
    pub fn build(&self) -> Vec<u8> {
        let mut primary = self.primary.clone();
        let mut exif = self.exif.clone();
        let has_exif = !exif.is_empty();

        let primary_entries = primary.len() + usize::from(has_exif);
        let primary_data = 8 + ifd_len(primary_entries);
        let exif_offset = primary_data + data_len(&primary);
        if has_exif {
            primary.push(Entry {
                tag: tag::EXIF_IFD_POINTER,
                kind: LONG,
                count: 1,
                bytes: (exif_offset as u32).to_le_bytes().to_vec(),
            });
        }
        primary.sort_by_key(|e| e.tag);
        exif.sort_by_key(|e| e.tag);

        let mut out = b"II".to_vec();
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&8u32.to_le_bytes());
        write_ifd(&mut out, &primary, primary_data);
        if has_exif {
            write_ifd(&mut out, &exif, exif_offset + ifd_len(exif.len()));
        }
        out
    }

    fn entries(&mut self, ifd: Ifd) -> &mut Vec<Entry> {
        match ifd {
            Ifd::Primary => &mut self.primary,
            Ifd::Exif => &mut self.exif,
        }
    }

    fn put(mut self, ifd: Ifd, entry: Entry) -> Self {
        let entries = self.entries(ifd);
        entries.retain(|e| e.tag != entry.tag);
        entries.push(entry);
        self
    }
}

/// Every photo-schema tag, holding the values of an Acme CameraX shot.
pub fn sample_photo() -> TiffBuilder {
    TiffBuilder::new()
        .ascii(Ifd::Primary, tag::MAKE, "Acme")
        .ascii(Ifd::Primary, tag::MODEL, "CameraX")
        .rational(Ifd::Exif, tag::EXPOSURE_TIME, 1, 200)
        .rational(Ifd::Exif, tag::F_NUMBER, 28, 10)
        .short(Ifd::Exif, tag::ISO, 100)
        .ascii(Ifd::Exif, tag::DATE_TIME_ORIGINAL, "2023:07:04 10:15:00")
        .long(Ifd::Exif, tag::PIXEL_X_DIMENSION, 6000)
        .long(Ifd::Exif, tag::PIXEL_Y_DIMENSION, 4000)
        .short(Ifd::Exif, tag::FOCAL_LENGTH_35MM, 35)
        .ascii(Ifd::Exif, tag::LENS_MAKE, "Acme")
        .ascii(Ifd::Exif, tag::LENS_MODEL, "35mm F2")
}

fn ifd_len(entries: usize) -> usize {
    2 + 12 * entries + 4
}

fn padded(len: usize) -> usize {
    len + len % 2
}

fn data_len(entries: &[Entry]) -> usize {
    entries
        .iter()
        .filter(|e| e.bytes.len() > 4)
        .map(|e| padded(e.bytes.len()))
        .sum()
}

fn write_ifd(out: &mut Vec<u8>, entries: &[Entry], data_offset: usize) {
    let mut data = Vec::new();
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for e in entries {
        out.extend_from_slice(&e.tag.to_le_bytes());
        out.extend_from_slice(&e.kind.to_le_bytes());
        out.extend_from_slice(&e.count.to_le_bytes());
        if e.bytes.len() <= 4 {
            let mut inline = e.bytes.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            let offset = (data_offset + data.len()) as u32;
            out.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&e.bytes);
            data.resize(padded(data.len()), 0);
        }
    }
    // No next IFD; thumbnails are never written.
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data);
}
