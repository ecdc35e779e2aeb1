use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

/// Extra font directories searched before the platform ones, in `PATH` syntax.
pub(crate) const FONT_PATH_ENV: &str = "CREDIT_REPORT_FONTS";

/// Where a face's glyphs come from.
pub(crate) enum FontSource {
    /// Standard-14 Helvetica; only WinAnsi characters are drawable.
    Builtin,
    TrueType {
        family: String,
        data: Vec<u8>,
        face_index: u32,
    },
}

/// A face resolved before layout, so wrapping and embedding use the same metrics.
pub(crate) struct FontFace {
    pub(crate) bold: bool,
    pub(crate) source: FontSource,
}

impl FontFace {
    pub(crate) fn helvetica(bold: bool) -> Self {
        Self {
            bold,
            source: FontSource::Builtin,
        }
    }

    pub(crate) fn base_font_name(&self) -> String {
        match &self.source {
            FontSource::Builtin if self.bold => "Helvetica-Bold".to_string(),
            FontSource::Builtin => "Helvetica".to_string(),
            FontSource::TrueType { family, .. } => {
                let ps = family.replace(' ', "");
                if self.bold { format!("{ps}-Bold") } else { ps }
            }
        }
    }

    pub(crate) fn can_draw(&self, ch: char) -> bool {
        match &self.source {
            FontSource::Builtin => winansi_byte(ch).is_some(),
            FontSource::TrueType {
                data, face_index, ..
            } => Face::parse(data, *face_index).is_ok_and(|face| face.glyph_index(ch).is_some()),
        }
    }

    /// Advance width of `text` in points.
    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match &self.source {
            FontSource::Builtin => {
                let units: f32 = text
                    .chars()
                    .filter_map(winansi_byte)
                    .map(|b| helvetica_advance(b, self.bold))
                    .sum();
                units * font_size / 1000.0
            }
            FontSource::TrueType {
                data, face_index, ..
            } => {
                let Ok(face) = Face::parse(data, *face_index) else {
                    return 0.0;
                };
                let units = face.units_per_em() as f32;
                text.chars()
                    .filter_map(|ch| face.glyph_index(ch))
                    .filter_map(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * font_size)
                    .sum()
            }
        }
    }
}

pub(crate) struct FontPair {
    pub(crate) regular: FontFace,
    pub(crate) bold: FontFace,
}

impl FontPair {
    pub(crate) fn helvetica() -> Self {
        Self {
            regular: FontFace::helvetica(false),
            bold: FontFace::helvetica(true),
        }
    }

    /// Resolve `family` from the font directories, falling back to Helvetica per
    /// weight when a face is missing.
    pub(crate) fn load(family: Option<&str>) -> Self {
        let Some(family) = family else {
            return Self::helvetica();
        };
        let t0 = std::time::Instant::now();
        let pair = Self {
            regular: load_face(family, false),
            bold: load_face(family, true),
        };
        log::debug!(
            "load fonts: {family} → {:.1}ms",
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        pair
    }

    pub(crate) fn face(&self, bold: bool) -> &FontFace {
        if bold { &self.bold } else { &self.regular }
    }

    /// A currency symbol both weights can draw. Symbols Helvetica lacks are
    /// replaced by their ISO code so totals never lose their unit.
    pub(crate) fn currency_symbol(&self, symbol: &str) -> String {
        let drawable = |ch: char| self.regular.can_draw(ch) && self.bold.can_draw(ch);
        if symbol.chars().all(drawable) {
            return symbol.to_string();
        }
        let substitute = match symbol.trim() {
            "\u{20A6}" => "NGN ".to_string(),
            "\u{20B9}" => "INR ".to_string(),
            "\u{20B5}" => "GHS ".to_string(),
            "\u{20B1}" => "PHP ".to_string(),
            "\u{20A9}" => "KRW ".to_string(),
            "\u{20BD}" => "RUB ".to_string(),
            "\u{20BA}" => "TRY ".to_string(),
            "\u{20B4}" => "UAH ".to_string(),
            other => other.chars().filter(|c| drawable(*c)).collect(),
        };
        log::warn!(
            "Currency symbol {symbol:?} is not drawable with {}; using {substitute:?}",
            self.regular.base_font_name(),
        );
        substitute
    }
}

fn load_face(family: &str, bold: bool) -> FontFace {
    let found = find_font_file(family, bold).and_then(|(path, face_index)| {
        let data = std::fs::read(&path).ok()?;
        Face::parse(&data, face_index).ok()?;
        log::debug!("{family} bold={bold} → {}", path.display());
        Some(FontFace {
            bold,
            source: FontSource::TrueType {
                family: family.to_string(),
                data,
                face_index,
            },
        })
    });
    found.unwrap_or_else(|| {
        log::warn!("Font not found: {family} bold={bold}, using Helvetica");
        FontFace::helvetica(bold)
    })
}

/// (lowercase family name, bold) -> (file path, face index within a collection)
type FontLookup = HashMap<(String, bool), (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

/// `CREDIT_REPORT_FONTS` entries first, then the platform directories.
fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::env::var_os(FONT_PATH_ENV)
        .map(|value| std::env::split_paths(&value).collect())
        .unwrap_or_default();
    dirs.retain(|d| !d.as_os_str().is_empty());
    dirs.extend(platform_font_dirs());
    dirs
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "macos") {
        let mut dirs: Vec<PathBuf> = vec![
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ];
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
        dirs
    } else if cfg!(windows) {
        let windir =
            std::env::var_os("WINDIR").map_or_else(|| PathBuf::from(r"C:\Windows"), PathBuf::from);
        vec![windir.join("Fonts")]
    } else {
        let mut dirs: Vec<PathBuf> =
            vec!["/usr/share/fonts".into(), "/usr/local/share/fonts".into()];
        dirs.extend(home.map(|h| h.join(".local/share/fonts")));
        dirs
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ["ttf", "otf", "ttc"].iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .find_map(|name| name.to_string())
}

/// Add every upright face in `path` to `index`. Earlier entries win.
fn index_font_file(path: &Path, index: &mut FontLookup) {
    let Ok(file) = std::fs::File::open(path) else {
        return;
    };
    // SAFETY: read-only mapping that does not outlive this call.
    let Ok(data) = (unsafe { Mmap::map(&file) }) else {
        return;
    };
    let faces = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
    for face_index in 0..faces {
        let Ok(face) = Face::parse(&data, face_index) else {
            continue;
        };
        if face.is_italic() {
            continue;
        }
        if let Some(family) = family_name(&face) {
            index
                .entry((family.to_lowercase(), face.is_bold()))
                .or_insert_with(|| (path.to_path_buf(), face_index));
        }
    }
}

fn scan_font_dirs() -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files = 0u32;
    let mut visited: HashSet<PathBuf> = HashSet::new();

    // Reversed so the first configured directory is walked first.
    let mut pending: Vec<PathBuf> = font_directories().into_iter().rev().collect();
    while let Some(dir) = pending.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if is_font_file(&path) {
                files += 1;
                index_font_file(&path, &mut index);
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {files} files → {} faces",
        t0.elapsed().as_secs_f64() * 1000.0,
        index.len(),
    );
    index
}

/// Look up a family and weight; bold falls back to the regular face.
fn find_font_file(family: &str, bold: bool) -> Option<(PathBuf, u32)> {
    let index = FONT_INDEX.get_or_init(scan_font_dirs);
    let key = family.to_lowercase();
    index
        .get(&(key.clone(), bold))
        .or_else(|| bold.then(|| index.get(&(key, false))).flatten())
        .cloned()
}

/// Code points of WinAnsi bytes 0x80..=0x9F; `None` marks unassigned bytes.
const WINANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

fn winansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
        _ => WINANSI_HIGH
            .iter()
            .position(|&m| m == Some(c))
            .map(|i| 0x80 + i as u8),
    }
}

/// WinAnsi bytes for a Type1 content stream; undrawable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(winansi_byte).collect()
}

/// Big-endian 2-byte glyph ids for an Identity-H CIDFont.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| char_to_gid.get(&ch).copied().unwrap_or(0).to_be_bytes())
        .collect()
}

/// Approximate Helvetica advance at 1000 units/em for a WinAnsi byte.
fn helvetica_advance(byte: u8, bold: bool) -> f32 {
    match (byte, bold) {
        (32, _) => 278.0,
        (33..=47 | 58..=64 | 91..=96, _) => 333.0,
        (48..=57, _) => 556.0,
        (73, _) | (74, false) => 278.0,
        (74, true) => 556.0,
        (77, _) | (109 | 119, false) => 833.0,
        (87, true) => 944.0,
        (65..=90, false) => 667.0,
        (65..=90, true) => 722.0,
        (105 | 106 | 108, _) | (102 | 116, false) => 278.0,
        (102 | 116, true) => 333.0,
        (109, true) => 889.0,
        (119, true) => 778.0,
        (97..=122, true) => 611.0,
        _ => 556.0,
    }
}

/// New glyph ids and PDF widths for the characters a subset keeps.
struct GlyphSubset {
    remapper: subsetter::GlyphRemapper,
    char_to_gid: HashMap<char, u16>,
    widths: Vec<(u16, f32)>,
}

fn subset_glyphs(face: &Face, used_chars: &HashSet<char>) -> GlyphSubset {
    let units = face.units_per_em() as f32;
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut widths = Vec::new();

    // Sorted so glyph ids, and therefore output bytes, are stable across runs.
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        let Some(gid) = face.glyph_index(ch) else {
            continue;
        };
        let new_gid = remapper.remap(gid.0);
        char_to_gid.insert(ch, new_gid);
        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
        widths.push((new_gid, advance as f32 / units * 1000.0));
    }
    widths.sort_by_key(|&(gid, _)| gid);
    widths.dedup_by_key(|&mut (gid, _)| gid);

    GlyphSubset {
        remapper,
        char_to_gid,
        widths,
    }
}

fn identity_system_info() -> SystemInfo<'static> {
    SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    }
}

/// Embed a TrueType face as a Type0/CIDFontType2 font with Identity-H encoding
/// and a ToUnicode map, subset to `used_chars`. Returns the char → glyph id map.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index).ok()?;
    let subset = subset_glyphs(&face, used_chars);

    let font_file = subsetter::subset(font_data, face_index, &subset.remapper).unwrap_or_else(|e| {
        log::warn!("Subsetting {ps_name} failed ({e}); embedding the whole file");
        font_data.to_vec()
    });
    let file_len = i32::try_from(font_file.len()).ok()?;

    let data_ref = alloc();
    pdf.stream(data_ref, &font_file).pair(Name(b"Length1"), file_len);

    let scale = 1000.0 / face.units_per_em() as f32;
    let bb = face.global_bounding_box();
    let descriptor_ref = alloc();
    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            bb.x_min as f32 * scale,
            bb.y_min as f32 * scale,
            bb.x_max as f32 * scale,
            bb.y_max as f32 * scale,
        ))
        .italic_angle(0.0)
        .ascent(face.ascender() as f32 * scale)
        .descent(face.descender() as f32 * scale)
        .cap_height(face.capital_height().map_or(700.0, |h| h as f32 * scale))
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(CidFontType::Type2)
            .base_font(Name(ps_name.as_bytes()))
            .system_info(identity_system_info())
            .font_descriptor(descriptor_ref)
            .default_width(0.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        if !subset.widths.is_empty() {
            let mut widths = cid.widths();
            for &(gid, width) in &subset.widths {
                widths.consecutive(gid, [width]);
            }
        }
    }

    let to_unicode_ref = alloc();
    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = UnicodeCmap::new(Name(cmap_name.as_bytes()), identity_system_info());
    let mut mappings: Vec<(u16, char)> = subset
        .char_to_gid
        .iter()
        .map(|(&ch, &gid)| (gid, ch))
        .collect();
    mappings.sort_unstable();
    for (gid, ch) in mappings {
        cmap.pair(gid, ch);
    }
    pdf.stream(to_unicode_ref, cmap.finish().as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(to_unicode_ref);

    Some(subset.char_to_gid)
}

/// A face written into the PDF, ready to encode text for content streams.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Write `face` under `pdf_name`. TrueType faces that fail to embed degrade to Helvetica.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    face: &FontFace,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();
    let base_name = face.base_font_name();

    let char_to_gid = match &face.source {
        FontSource::TrueType {
            data, face_index, ..
        } => {
            let embedded =
                embed_truetype(pdf, font_ref, &base_name, data, *face_index, used_chars, alloc);
            if embedded.is_none() {
                log::warn!("Embedding {base_name} failed, using Helvetica");
            }
            embedded
        }
        FontSource::Builtin => None,
    };

    if char_to_gid.is_none() {
        let builtin: &[u8] = if face.bold {
            b"Helvetica-Bold"
        } else {
            b"Helvetica"
        };
        pdf.type1_font(font_ref)
            .base_font(Name(builtin))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_font: {pdf_name} = {base_name} ({} chars) → {:.1}ms",
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAIRA: char = '\u{20A6}';

    /// First installed family (by name) whose regular face draws `ch`.
    fn installed_family_with(ch: char) -> Option<String> {
        let index = FONT_INDEX.get_or_init(scan_font_dirs);
        let mut regular: Vec<_> = index.iter().filter(|((_, bold), _)| !bold).collect();
        regular.sort();
        regular.into_iter().find_map(|((family, _), (path, face_index))| {
            let data = std::fs::read(path).ok()?;
            let face = Face::parse(&data, *face_index).ok()?;
            face.glyph_index(ch)?;
            Some(family.clone())
        })
    }

    #[test]
    fn bold_helvetica_is_wider() {
        let regular = FontFace::helvetica(false);
        let bold = FontFace::helvetica(true);
        let text = "Credit Profile Report";
        assert!(bold.text_width(text, 10.0) > regular.text_width(text, 10.0));
    }

    #[test]
    fn unmappable_chars_are_dropped_from_winansi() {
        assert_eq!(to_winansi_bytes("\u{20A6}100"), b"100".to_vec());
        assert_eq!(to_winansi_bytes("\u{20AC}5"), vec![0x80, b'5']);
        assert_eq!(to_winansi_bytes("\u{2014}\u{0178}"), vec![0x97, 0x9F]);
    }

    #[test]
    fn builtin_width_scales_with_size() {
        let face = FontFace::helvetica(false);
        let w10 = face.text_width("abc", 10.0);
        let w20 = face.text_width("abc", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
        assert_eq!(face.text_width("", 12.0), 0.0);
    }

    #[test]
    fn gid_encoding_is_big_endian() {
        let map = HashMap::from([('A', 0x0102u16)]);
        assert_eq!(encode_as_gids("AB", &map), vec![0x01, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn helvetica_replaces_naira_with_iso_code() {
        let pair = FontPair::helvetica();
        assert_eq!(pair.currency_symbol("\u{20A6}"), "NGN ");
        assert_eq!(pair.currency_symbol("$"), "$");
        assert_eq!(pair.currency_symbol("\u{20AC}"), "\u{20AC}");
        assert_eq!(pair.currency_symbol("\u{20BF}x"), "x");
    }

    #[test]
    fn unknown_family_falls_back_to_helvetica() {
        let pair = FontPair::load(Some("No Such Family 7f3a"));
        assert!(matches!(pair.regular.source, FontSource::Builtin));
        assert!(matches!(pair.bold.source, FontSource::Builtin));
        assert_eq!(pair.regular.base_font_name(), "Helvetica");
    }

    #[test]
    fn truetype_family_embeds_as_identity_h_with_naira_glyph() {
        let Some(family) = installed_family_with(NAIRA) else {
            eprintln!("skipping: no installed font draws U+20A6");
            return;
        };
        let pair = FontPair::load(Some(&family));
        assert!(matches!(pair.regular.source, FontSource::TrueType { .. }));
        assert!(pair.regular.can_draw(NAIRA));
        assert!(pair.regular.text_width("\u{20A6}100", 10.0) > 0.0);

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };
        let catalog = alloc();
        pdf.catalog(catalog);
        let used: HashSet<char> = "\u{20A6}1,250.00".chars().collect();
        let entry = register_font(&mut pdf, &pair.regular, "F1".into(), &mut alloc, &used);

        let map = entry.char_to_gid.as_ref().expect("embedded as a CID font");
        assert_ne!(map[&NAIRA], 0);
        assert_eq!(entry.encode("\u{20A6}").len(), 2);

        let bytes = pdf.finish();
        let has = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        assert!(has(b"/Identity-H"));
        assert!(has(b"/ToUnicode"));
        assert!(has(b"/FontFile2"));
    }
}
