use crate::{
    refs::{ObjectReferences, RefType},
    Pt, ReportError,
};
use id_arena::Id;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Str,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// The PDF base-14 fonts this crate knows metrics for. These are never embedded;
/// every conforming PDF reader ships them, which makes them the fallback when a
/// TrueType font cannot be loaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

// advance widths for the printable ASCII range (0x20..=0x7e), in 1/1000 em
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl StandardFont {
    const ASCENDER: i16 = 718;

    fn base_name(&self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    fn advance(&self, ch: char) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        let code = ch as u32;
        if (0x20..=0x7e).contains(&code) {
            table[(code - 0x20) as usize]
        } else {
            556
        }
    }
}

pub enum FontKind {
    /// A TrueType / OpenType face, embedded in its entirety when written
    TrueType(OwnedFace),
    Standard(StandardFont),
}

/// A font that text spans can be set in. Fonts are stored once per document and
/// referred to by their [Id] from every page.
pub struct Font {
    pub kind: FontKind,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ReportError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font {
            kind: FontKind::TrueType(face),
        })
    }

    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<Font, ReportError> {
        Font::load(std::fs::read(path)?)
    }

    pub fn standard(font: StandardFont) -> Font {
        Font {
            kind: FontKind::Standard(font),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, FontKind::TrueType(_))
    }

    /// Font units to points at the given size
    fn scaling(&self, size: Pt) -> Pt {
        match &self.kind {
            FontKind::TrueType(face) => size / face.as_face_ref().units_per_em() as f32,
            FontKind::Standard(_) => size / 1000.0,
        }
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        let units = match &self.kind {
            FontKind::TrueType(face) => face.as_face_ref().ascender(),
            FontKind::Standard(_) => StandardFont::ASCENDER,
        };
        self.scaling(size) * units as f32
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = match &self.kind {
            FontKind::TrueType(face) => {
                let face = face.as_face_ref();
                text.chars()
                    .map(|ch| {
                        face.glyph_hor_advance(GlyphId(glyph_for(face, ch)))
                            .unwrap_or_default() as u32
                    })
                    .sum()
            }
            FontKind::Standard(font) => text.chars().map(|ch| font.advance(ch) as u32).sum(),
        };
        self.scaling(size) * units as f32
    }

    /// Encode text the way the font's PDF encoding expects it: big-endian glyph
    /// ids for embedded faces (Identity-H), single WinAnsi bytes for standard fonts
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match &self.kind {
            FontKind::TrueType(face) => {
                let face = face.as_face_ref();
                text.chars()
                    .flat_map(|ch| glyph_for(face, ch).to_be_bytes())
                    .collect()
            }
            FontKind::Standard(_) => text
                .chars()
                .map(|ch| match ch as u32 {
                    code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
                    _ => b'?',
                })
                .collect(),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_ref = refs.gen(RefType::Font(font_index));

        match &self.kind {
            FontKind::Standard(font) => {
                writer
                    .type1_font(font_ref)
                    .base_font(Name(font.base_name()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontKind::TrueType(owned) => {
                let face = owned.as_face_ref();
                let base_name = postscript_name(face).unwrap_or_else(|| format!("F{font_index}"));
                let glyphs = glyph_map(face);

                let cid_ref = write_cid(face, owned.as_slice(), &glyphs, &base_name, refs, font_index, writer);
                let to_unicode_ref = refs.gen(RefType::ToUnicode(font_index));
                let cmap = compress_to_vec_zlib(
                    to_unicode_cmap(&glyphs).as_bytes(),
                    CompressionLevel::DefaultLevel as u8,
                );
                writer
                    .stream(to_unicode_ref, cmap.as_slice())
                    .filter(Filter::FlateDecode);

                writer
                    .type0_font(font_ref)
                    .base_font(Name(base_name.as_bytes()))
                    .encoding_predefined(Name(b"Identity-H"))
                    .descendant_font(cid_ref)
                    .to_unicode(to_unicode_ref);
            }
        }
    }
}

fn glyph_for(face: &Face<'_>, ch: char) -> u16 {
    face.glyph_index(ch)
        .or_else(|| face.glyph_index('\u{FFFD}'))
        .or_else(|| face.glyph_index('?'))
        .map(|gid| gid.0)
        .unwrap_or(0)
}

fn postscript_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
        .and_then(|name| name.to_string())
        .map(|name| name.chars().filter(|ch| !ch.is_whitespace()).collect::<String>())
        .filter(|name| !name.is_empty())
}

fn family_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
        .and_then(|name| name.to_string())
}

/// Glyph id to the first unicode character mapping onto it, ordered by glyph id
fn glyph_map(face: &Face<'_>) -> BTreeMap<u16, char> {
    let mut map: BTreeMap<u16, char> = BTreeMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };

    for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
        subtable.codepoints(|codepoint: u32| {
            if let Ok(ch) = char::try_from(codepoint) {
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            }
        });
    }

    map
}

fn write_cid(
    face: &Face<'_>,
    data: &[u8],
    glyphs: &BTreeMap<u16, char>,
    base_name: &str,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> pdf_writer::Ref {
    let scaling = 1000.0 / face.units_per_em() as f32;

    // font program
    let data_ref = refs.gen(RefType::FontData(font_index));
    let compressed = compress_to_vec_zlib(data, CompressionLevel::DefaultLevel as u8);
    writer
        .stream(data_ref, compressed.as_slice())
        .filter(Filter::FlateDecode)
        .pair(Name(b"Length1"), data.len() as i32);

    // descriptor
    let descriptor_ref = refs.gen(RefType::FontDescriptor(font_index));
    let bbox = face.global_bounding_box();
    let mut flags = FontFlags::empty();
    if face.is_monospaced() {
        flags.set(FontFlags::FIXED_PITCH, true);
    }
    if face.is_italic() {
        flags.set(FontFlags::ITALIC, true);
    }

    let mut descriptor = writer.font_descriptor(descriptor_ref);
    descriptor.name(Name(base_name.as_bytes()));
    if let Some(family) = family_name(face) {
        descriptor.family(Str(family.as_bytes()));
    }
    descriptor.weight(face.weight().to_number());
    descriptor.flags(flags);
    descriptor.bbox(pdf_writer::Rect {
        x1: bbox.x_min as f32 * scaling,
        y1: bbox.y_min as f32 * scaling,
        x2: bbox.x_max as f32 * scaling,
        y2: bbox.y_max as f32 * scaling,
    });
    descriptor.italic_angle(0.0);
    descriptor.ascent(face.ascender() as f32 * scaling);
    descriptor.descent(face.descender() as f32 * scaling);
    descriptor.cap_height(
        face.capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(face.ascender() as f32 * scaling),
    );
    // TODO: derive stem_v from the OS/2 weight class instead of a constant
    descriptor.stem_v(80.0);
    descriptor.font_file2(data_ref);
    descriptor.finish();

    // descendant CID font with its width runs
    let mut runs: Vec<(u16, Vec<f32>)> = Vec::new();
    for &gid in glyphs.keys() {
        let width = face.glyph_hor_advance(GlyphId(gid)).unwrap_or_default() as f32 * scaling;
        match runs.last_mut() {
            Some((start, widths)) if *start as usize + widths.len() == gid as usize => {
                widths.push(width)
            }
            _ => runs.push((gid, vec![width])),
        }
    }

    let cid_ref = refs.gen(RefType::CidFont(font_index));
    let mut cid_font = writer.cid_font(cid_ref);
    cid_font.subtype(CidFontType::Type2);
    cid_font.base_font(Name(base_name.as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(descriptor_ref);
    cid_font.default_width(
        face.glyph_hor_advance(GlyphId(0)).unwrap_or_default() as f32 * scaling,
    );
    let mut widths = cid_font.widths();
    for (start, run) in runs {
        widths.consecutive(start, run);
    }
    widths.finish();
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

    cid_ref
}

/// Builds the ToUnicode CMap so that text in the generated PDF can be copied and searched
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    // bfchar blocks hold at most 100 entries
    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    for block in entries.chunks(100) {
        let _ = writeln!(map, "{} beginbfchar", block.len());
        for (gid, ch) in block {
            let mut utf16 = [0u16; 2];
            let code: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|unit| format!("{unit:04x}"))
                .collect();
            let _ = writeln!(map, "<{gid:04x}> <{code}>");
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");
    map
}
