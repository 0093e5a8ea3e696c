//! Base encoding tables: character code to Adobe glyph name.
//!
//! Per PDF Spec ISO 32000-1:2008, Section 9.6.6 and Appendix D, a simple
//! font's `/Encoding` selects one of a handful of named 256-slot tables
//! mapping byte codes to *glyph names* — not directly to Unicode. The
//! glyph name is then resolved to a Unicode code point via the Adobe
//! Glyph List (see [`super::glyph_list`]). This indirection matters
//! because `/Differences` arrays in a custom encoding dictionary also
//! assign glyph names to codes, and must go through the exact same
//! name → Unicode step as the base table.
//!
//! The printable ASCII range (0x20-0x7E) is shared by all four encodings
//! with two exceptions (`quotesingle`/`quoteright` at 0x27 and
//! `grave`/`quoteleft` at 0x60), which WinAnsi and the Mac/Standard
//! family disagree on.

/// Look up the glyph name for `code` under the named base encoding.
///
/// Recognizes `WinAnsiEncoding`, `MacRomanEncoding`, `MacExpertEncoding`,
/// and `StandardEncoding` (also used as the fallback for any other or
/// missing base encoding name, per PDF spec default behavior).
pub fn base_encoding(name: &str, code: u8) -> Option<&'static str> {
    match name {
        "WinAnsiEncoding" => WIN_ANSI[code as usize],
        "MacRomanEncoding" => MAC_ROMAN[code as usize],
        "MacExpertEncoding" => MAC_EXPERT[code as usize],
        _ => STANDARD[code as usize],
    }
}

const fn ascii_block() -> [Option<&'static str>; 256] {
    let mut table: [Option<&'static str>; 256] = [None; 256];
    table[0x20] = Some("space");
    table[0x21] = Some("exclam");
    table[0x22] = Some("quotedbl");
    table[0x23] = Some("numbersign");
    table[0x24] = Some("dollar");
    table[0x25] = Some("percent");
    table[0x26] = Some("ampersand");
    table[0x28] = Some("parenleft");
    table[0x29] = Some("parenright");
    table[0x2A] = Some("asterisk");
    table[0x2B] = Some("plus");
    table[0x2C] = Some("comma");
    table[0x2D] = Some("hyphen");
    table[0x2E] = Some("period");
    table[0x2F] = Some("slash");
    table[0x30] = Some("zero");
    table[0x31] = Some("one");
    table[0x32] = Some("two");
    table[0x33] = Some("three");
    table[0x34] = Some("four");
    table[0x35] = Some("five");
    table[0x36] = Some("six");
    table[0x37] = Some("seven");
    table[0x38] = Some("eight");
    table[0x39] = Some("nine");
    table[0x3A] = Some("colon");
    table[0x3B] = Some("semicolon");
    table[0x3C] = Some("less");
    table[0x3D] = Some("equal");
    table[0x3E] = Some("greater");
    table[0x3F] = Some("question");
    table[0x40] = Some("at");
    table[0x41] = Some("A");
    table[0x42] = Some("B");
    table[0x43] = Some("C");
    table[0x44] = Some("D");
    table[0x45] = Some("E");
    table[0x46] = Some("F");
    table[0x47] = Some("G");
    table[0x48] = Some("H");
    table[0x49] = Some("I");
    table[0x4A] = Some("J");
    table[0x4B] = Some("K");
    table[0x4C] = Some("L");
    table[0x4D] = Some("M");
    table[0x4E] = Some("N");
    table[0x4F] = Some("O");
    table[0x50] = Some("P");
    table[0x51] = Some("Q");
    table[0x52] = Some("R");
    table[0x53] = Some("S");
    table[0x54] = Some("T");
    table[0x55] = Some("U");
    table[0x56] = Some("V");
    table[0x57] = Some("W");
    table[0x58] = Some("X");
    table[0x59] = Some("Y");
    table[0x5A] = Some("Z");
    table[0x5B] = Some("bracketleft");
    table[0x5C] = Some("backslash");
    table[0x5D] = Some("bracketright");
    table[0x5E] = Some("asciicircum");
    table[0x5F] = Some("underscore");
    table[0x61] = Some("a");
    table[0x62] = Some("b");
    table[0x63] = Some("c");
    table[0x64] = Some("d");
    table[0x65] = Some("e");
    table[0x66] = Some("f");
    table[0x67] = Some("g");
    table[0x68] = Some("h");
    table[0x69] = Some("i");
    table[0x6A] = Some("j");
    table[0x6B] = Some("k");
    table[0x6C] = Some("l");
    table[0x6D] = Some("m");
    table[0x6E] = Some("n");
    table[0x6F] = Some("o");
    table[0x70] = Some("p");
    table[0x71] = Some("q");
    table[0x72] = Some("r");
    table[0x73] = Some("s");
    table[0x74] = Some("t");
    table[0x75] = Some("u");
    table[0x76] = Some("v");
    table[0x77] = Some("w");
    table[0x78] = Some("x");
    table[0x79] = Some("y");
    table[0x7A] = Some("z");
    table[0x7B] = Some("braceleft");
    table[0x7C] = Some("bar");
    table[0x7D] = Some("braceright");
    table[0x7E] = Some("asciitilde");
    table
}

/// WinAnsiEncoding (Windows code page 1252), PDF spec Appendix D.
static WIN_ANSI: [Option<&'static str>; 256] = {
    let mut t = ascii_block();
    t[0x27] = Some("quotesingle");
    t[0x60] = Some("grave");
    t[0x80] = Some("Euro");
    t[0x82] = Some("quotesinglbase");
    t[0x83] = Some("florin");
    t[0x84] = Some("quotedblbase");
    t[0x85] = Some("ellipsis");
    t[0x86] = Some("dagger");
    t[0x87] = Some("daggerdbl");
    t[0x88] = Some("circumflex");
    t[0x89] = Some("perthousand");
    t[0x8A] = Some("Scaron");
    t[0x8B] = Some("guilsinglleft");
    t[0x8C] = Some("OE");
    t[0x8E] = Some("Zcaron");
    t[0x91] = Some("quoteleft");
    t[0x92] = Some("quoteright");
    t[0x93] = Some("quotedblleft");
    t[0x94] = Some("quotedblright");
    t[0x95] = Some("bullet");
    t[0x96] = Some("endash");
    t[0x97] = Some("emdash");
    t[0x98] = Some("tilde");
    t[0x99] = Some("trademark");
    t[0x9A] = Some("scaron");
    t[0x9B] = Some("guilsinglright");
    t[0x9C] = Some("oe");
    t[0x9E] = Some("zcaron");
    t[0x9F] = Some("Ydieresis");
    t[0xA0] = Some("space");
    t[0xA1] = Some("exclamdown");
    t[0xA2] = Some("cent");
    t[0xA3] = Some("sterling");
    t[0xA4] = Some("currency");
    t[0xA5] = Some("yen");
    t[0xA6] = Some("brokenbar");
    t[0xA7] = Some("section");
    t[0xA8] = Some("dieresis");
    t[0xA9] = Some("copyright");
    t[0xAA] = Some("ordfeminine");
    t[0xAB] = Some("guillemotleft");
    t[0xAC] = Some("logicalnot");
    t[0xAD] = Some("hyphen");
    t[0xAE] = Some("registered");
    t[0xAF] = Some("macron");
    t[0xB0] = Some("degree");
    t[0xB1] = Some("plusminus");
    t[0xB2] = Some("twosuperior");
    t[0xB3] = Some("threesuperior");
    t[0xB4] = Some("acute");
    t[0xB5] = Some("mu");
    t[0xB6] = Some("paragraph");
    t[0xB7] = Some("periodcentered");
    t[0xB8] = Some("cedilla");
    t[0xB9] = Some("onesuperior");
    t[0xBA] = Some("ordmasculine");
    t[0xBB] = Some("guillemotright");
    t[0xBC] = Some("onequarter");
    t[0xBD] = Some("onehalf");
    t[0xBE] = Some("threequarters");
    t[0xBF] = Some("questiondown");
    t[0xC0] = Some("Agrave");
    t[0xC1] = Some("Aacute");
    t[0xC2] = Some("Acircumflex");
    t[0xC3] = Some("Atilde");
    t[0xC4] = Some("Adieresis");
    t[0xC5] = Some("Aring");
    t[0xC6] = Some("AE");
    t[0xC7] = Some("Ccedilla");
    t[0xC8] = Some("Egrave");
    t[0xC9] = Some("Eacute");
    t[0xCA] = Some("Ecircumflex");
    t[0xCB] = Some("Edieresis");
    t[0xCC] = Some("Igrave");
    t[0xCD] = Some("Iacute");
    t[0xCE] = Some("Icircumflex");
    t[0xCF] = Some("Idieresis");
    t[0xD0] = Some("Eth");
    t[0xD1] = Some("Ntilde");
    t[0xD2] = Some("Ograve");
    t[0xD3] = Some("Oacute");
    t[0xD4] = Some("Ocircumflex");
    t[0xD5] = Some("Otilde");
    t[0xD6] = Some("Odieresis");
    t[0xD7] = Some("multiply");
    t[0xD8] = Some("Oslash");
    t[0xD9] = Some("Ugrave");
    t[0xDA] = Some("Uacute");
    t[0xDB] = Some("Ucircumflex");
    t[0xDC] = Some("Udieresis");
    t[0xDD] = Some("Yacute");
    t[0xDE] = Some("Thorn");
    t[0xDF] = Some("germandbls");
    t[0xE0] = Some("agrave");
    t[0xE1] = Some("aacute");
    t[0xE2] = Some("acircumflex");
    t[0xE3] = Some("atilde");
    t[0xE4] = Some("adieresis");
    t[0xE5] = Some("aring");
    t[0xE6] = Some("ae");
    t[0xE7] = Some("ccedilla");
    t[0xE8] = Some("egrave");
    t[0xE9] = Some("eacute");
    t[0xEA] = Some("ecircumflex");
    t[0xEB] = Some("edieresis");
    t[0xEC] = Some("igrave");
    t[0xED] = Some("iacute");
    t[0xEE] = Some("icircumflex");
    t[0xEF] = Some("idieresis");
    t[0xF0] = Some("eth");
    t[0xF1] = Some("ntilde");
    t[0xF2] = Some("ograve");
    t[0xF3] = Some("oacute");
    t[0xF4] = Some("ocircumflex");
    t[0xF5] = Some("otilde");
    t[0xF6] = Some("odieresis");
    t[0xF7] = Some("divide");
    t[0xF8] = Some("oslash");
    t[0xF9] = Some("ugrave");
    t[0xFA] = Some("uacute");
    t[0xFB] = Some("ucircumflex");
    t[0xFC] = Some("udieresis");
    t[0xFD] = Some("yacute");
    t[0xFE] = Some("thorn");
    t[0xFF] = Some("ydieresis");
    t
};

/// StandardEncoding, PDF spec Appendix D. Differs from WinAnsi in the
/// ASCII range at 0x27/0x60, and covers only a practical subset of the
/// high range (accented Latin letters and symbols seen in real PDFs);
/// positions the spec leaves undefined or that are vanishingly rare in
/// practice resolve to `None` rather than a guessed name.
static STANDARD: [Option<&'static str>; 256] = {
    let mut t = ascii_block();
    t[0x27] = Some("quoteright");
    t[0x60] = Some("quoteleft");
    t[0xA1] = Some("exclamdown");
    t[0xA2] = Some("cent");
    t[0xA3] = Some("sterling");
    t[0xA4] = Some("fraction");
    t[0xA5] = Some("yen");
    t[0xA6] = Some("florin");
    t[0xA7] = Some("section");
    t[0xA8] = Some("currency");
    t[0xA9] = Some("quotesingle");
    t[0xAA] = Some("quotedblleft");
    t[0xAB] = Some("guillemotleft");
    t[0xAC] = Some("guilsinglleft");
    t[0xAD] = Some("guilsinglright");
    t[0xAE] = Some("fi");
    t[0xAF] = Some("fl");
    t[0xB1] = Some("endash");
    t[0xB2] = Some("dagger");
    t[0xB3] = Some("daggerdbl");
    t[0xB4] = Some("periodcentered");
    t[0xB6] = Some("paragraph");
    t[0xB7] = Some("bullet");
    t[0xB8] = Some("quotesinglbase");
    t[0xB9] = Some("quotedblbase");
    t[0xBA] = Some("quotedblright");
    t[0xBB] = Some("guillemotright");
    t[0xBC] = Some("ellipsis");
    t[0xBD] = Some("perthousand");
    t[0xBF] = Some("questiondown");
    t[0xC1] = Some("grave");
    t[0xC2] = Some("acute");
    t[0xC3] = Some("circumflex");
    t[0xC4] = Some("tilde");
    t[0xC5] = Some("macron");
    t[0xC6] = Some("breve");
    t[0xC7] = Some("dotaccent");
    t[0xC8] = Some("dieresis");
    t[0xCA] = Some("ring");
    t[0xCB] = Some("cedilla");
    t[0xCD] = Some("hungarumlaut");
    t[0xCE] = Some("ogonek");
    t[0xCF] = Some("caron");
    t[0xD0] = Some("emdash");
    t[0xE1] = Some("AE");
    t[0xE3] = Some("ordfeminine");
    t[0xE8] = Some("Lslash");
    t[0xE9] = Some("Oslash");
    t[0xEA] = Some("OE");
    t[0xEB] = Some("ordmasculine");
    t[0xF1] = Some("ae");
    t[0xF5] = Some("dotlessi");
    t[0xF8] = Some("lslash");
    t[0xF9] = Some("oslash");
    t[0xFA] = Some("oe");
    t[0xFB] = Some("germandbls");
    t
};

/// MacRomanEncoding, PDF spec Appendix D. High range covers the common
/// accented Latin letters and typographic symbols; rarer math/technical
/// glyphs resolve to `None`.
static MAC_ROMAN: [Option<&'static str>; 256] = {
    let mut t = ascii_block();
    t[0x27] = Some("quotesingle");
    t[0x60] = Some("grave");
    t[0x80] = Some("Adieresis");
    t[0x81] = Some("Aring");
    t[0x82] = Some("Ccedilla");
    t[0x83] = Some("Eacute");
    t[0x84] = Some("Ntilde");
    t[0x85] = Some("Odieresis");
    t[0x86] = Some("Udieresis");
    t[0x87] = Some("aacute");
    t[0x88] = Some("agrave");
    t[0x89] = Some("acircumflex");
    t[0x8A] = Some("adieresis");
    t[0x8B] = Some("atilde");
    t[0x8C] = Some("aring");
    t[0x8D] = Some("ccedilla");
    t[0x8E] = Some("eacute");
    t[0x8F] = Some("egrave");
    t[0x90] = Some("ecircumflex");
    t[0x91] = Some("edieresis");
    t[0x92] = Some("iacute");
    t[0x93] = Some("igrave");
    t[0x94] = Some("icircumflex");
    t[0x95] = Some("idieresis");
    t[0x96] = Some("ntilde");
    t[0x97] = Some("oacute");
    t[0x98] = Some("ograve");
    t[0x99] = Some("ocircumflex");
    t[0x9A] = Some("odieresis");
    t[0x9B] = Some("otilde");
    t[0x9C] = Some("uacute");
    t[0x9D] = Some("ugrave");
    t[0x9E] = Some("ucircumflex");
    t[0x9F] = Some("udieresis");
    t[0xA0] = Some("dagger");
    t[0xA1] = Some("degree");
    t[0xA2] = Some("cent");
    t[0xA3] = Some("sterling");
    t[0xA4] = Some("section");
    t[0xA5] = Some("bullet");
    t[0xA6] = Some("paragraph");
    t[0xA7] = Some("germandbls");
    t[0xA8] = Some("registered");
    t[0xA9] = Some("copyright");
    t[0xAA] = Some("trademark");
    t[0xAB] = Some("acute");
    t[0xAC] = Some("dieresis");
    t[0xAE] = Some("AE");
    t[0xAF] = Some("Oslash");
    t[0xB1] = Some("plusminus");
    t[0xB4] = Some("yen");
    t[0xB5] = Some("mu");
    t[0xBB] = Some("ordfeminine");
    t[0xBC] = Some("ordmasculine");
    t[0xBE] = Some("ae");
    t[0xBF] = Some("oslash");
    t[0xC0] = Some("questiondown");
    t[0xC1] = Some("exclamdown");
    t[0xC2] = Some("logicalnot");
    t[0xC4] = Some("florin");
    t[0xC7] = Some("guillemotleft");
    t[0xC8] = Some("guillemotright");
    t[0xC9] = Some("ellipsis");
    t[0xCA] = Some("space");
    t[0xCB] = Some("Agrave");
    t[0xCC] = Some("Atilde");
    t[0xCD] = Some("Otilde");
    t[0xCE] = Some("OE");
    t[0xCF] = Some("oe");
    t[0xD0] = Some("endash");
    t[0xD1] = Some("emdash");
    t[0xD2] = Some("quotedblleft");
    t[0xD3] = Some("quotedblright");
    t[0xD4] = Some("quoteleft");
    t[0xD5] = Some("quoteright");
    t[0xD6] = Some("divide");
    t[0xD8] = Some("ydieresis");
    t[0xD9] = Some("Ydieresis");
    t[0xDA] = Some("fraction");
    t[0xDB] = Some("currency");
    t[0xDC] = Some("guilsinglleft");
    t[0xDD] = Some("guilsinglright");
    t[0xDE] = Some("fi");
    t[0xDF] = Some("fl");
    t[0xE0] = Some("daggerdbl");
    t[0xE1] = Some("periodcentered");
    t[0xE2] = Some("quotesinglbase");
    t[0xE3] = Some("quotedblbase");
    t[0xE4] = Some("perthousand");
    t[0xE5] = Some("Acircumflex");
    t[0xE6] = Some("Ecircumflex");
    t[0xE7] = Some("Aacute");
    t[0xE8] = Some("Edieresis");
    t[0xE9] = Some("Egrave");
    t[0xEA] = Some("Iacute");
    t[0xEB] = Some("Icircumflex");
    t[0xEC] = Some("Idieresis");
    t[0xED] = Some("Igrave");
    t[0xEE] = Some("Oacute");
    t[0xEF] = Some("Ocircumflex");
    t[0xF1] = Some("Ograve");
    t[0xF2] = Some("Uacute");
    t[0xF3] = Some("Ucircumflex");
    t[0xF4] = Some("Ugrave");
    t[0xF5] = Some("dotlessi");
    t[0xF6] = Some("circumflex");
    t[0xF7] = Some("tilde");
    t[0xF8] = Some("macron");
    t[0xF9] = Some("breve");
    t[0xFA] = Some("dotaccent");
    t[0xFB] = Some("ring");
    t[0xFC] = Some("cedilla");
    t[0xFD] = Some("hungarumlaut");
    t[0xFE] = Some("ogonek");
    t[0xFF] = Some("caron");
    t
};

/// MacExpertEncoding, PDF spec Appendix D. Expert-set fonts (small caps,
/// oldstyle figures, fractions) are rare in extracted text; only the
/// ASCII punctuation/digit range that maps to meaningfully different
/// glyphs is covered, everything else falls back to `None`.
static MAC_EXPERT: [Option<&'static str>; 256] = {
    let mut t: [Option<&'static str>; 256] = [None; 256];
    t[0x20] = Some("space");
    t[0x21] = Some("exclamsmall");
    t[0x2C] = Some("comma");
    t[0x2E] = Some("period");
    t[0x3A] = Some("colon");
    t[0x3B] = Some("semicolon");
    t
};
