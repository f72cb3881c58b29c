// src/data/recognizers.rs

//! Recognizers and regenerators for file permissions, URLs, numbers and
//! words.
//!
//! The network addresses are in [`net`], dates and times in [`datetime`].
//!
//! [`net`]: crate::data::net
//! [`datetime`]: crate::data::datetime

use crate::common::{split_keep, CGP_PUNCT};
use crate::data::mapping::{generate_random_binary, map_chars, MappingTables, RE_PUNCT_RUN};

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::phf::phf_set;
use ::rand::Rng;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file permissions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `ls -l` permissions, e.g. `drwxr-xr-x`, `-rw-r--r--@`.
pub const RP_FILE_PERMISSION_UNIX: &str = r"(?i)^([dlcbpsw-])([rts-][wts-][xts-])([rts-][wts-][xts-])([rts-][wts-][xts-])([+@.-]{0,2})$";

/// Windows `dir` / PowerShell modes, e.g. `d-----`, `-a----`.
pub const RP_FILE_PERMISSION_WIN: &str = r"(?i)^([d-])([rhsail-]{5})$";

lazy_static! {
    static ref RE_FILE_PERMISSION_UNIX: Regex = Regex::new(RP_FILE_PERMISSION_UNIX).unwrap();
    static ref RE_FILE_PERMISSION_WIN: Regex = Regex::new(RP_FILE_PERMISSION_WIN).unwrap();
}

/// A recognized file permission string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilePermissionNode {
    Unix {
        type_char: char,
        owner: String,
        group: String,
        other: String,
        /// trailing `+`, `@`, `.` markers
        extended: String,
    },
    Windows {
        type_char: char,
        attributes: String,
    },
}

pub fn parse_file_permission(text: &str) -> Option<FilePermissionNode> {
    if let Some(caps) = RE_FILE_PERMISSION_UNIX.captures(text) {
        return Some(FilePermissionNode::Unix {
            type_char: caps[1].chars().next()?,
            owner: String::from(&caps[2]),
            group: String::from(&caps[3]),
            other: String::from(&caps[4]),
            extended: String::from(&caps[5]),
        });
    }
    let caps = RE_FILE_PERMISSION_WIN.captures(text)?;

    Some(FilePermissionNode::Windows {
        type_char: caps[1].chars().next()?,
        attributes: String::from(&caps[2]),
    })
}

/// Remap one `rwx` triple through the `file_permission` table.
///
/// The triple is read as bits (anything but `-` is set), the octal digit is
/// substituted, and the new bits are rendered as `rwx-`. Characters of the
/// original that are not lowercase `rwx-` (`s`, `t`, `S`, uppercase) stay
/// where they are.
fn remap_permission_triple(
    triple: &str,
    tables: &MappingTables,
) -> String {
    let chars: Vec<char> = triple.chars().collect();
    let value: u32 = chars
        .iter()
        .fold(0, |acc, c| (acc << 1) | u32::from(*c != '-'));
    let digit = char::from_digit(value, 8).unwrap_or('0');
    let new_value = tables
        .file_permission
        .get(&digit)
        .and_then(|c| c.to_digit(8))
        .unwrap_or(value);

    chars
        .iter()
        .zip("rwx".chars())
        .enumerate()
        .map(|(at, (original, letter))| {
            if !matches!(original, 'r' | 'w' | 'x' | '-') {
                *original
            } else if new_value & (0b100 >> at) != 0 {
                letter
            } else {
                '-'
            }
        })
        .collect()
}

impl FilePermissionNode {
    pub fn generate_new(
        &self,
        tables: &MappingTables,
    ) -> String {
        match self {
            FilePermissionNode::Unix {
                type_char,
                owner,
                group,
                other,
                extended,
            } => {
                let bits = format!("{}{}{}", owner, group, other);
                if bits.chars().all(|c| c == '-') {
                    return format!("{}{}{}", type_char, bits, extended);
                }
                format!(
                    "{}{}{}{}{}",
                    type_char,
                    remap_permission_triple(owner, tables),
                    remap_permission_triple(group, tables),
                    remap_permission_triple(other, tables),
                    extended
                )
            }
            FilePermissionNode::Windows {
                type_char,
                attributes,
            } => {
                let mode = format!("{}{}", type_char, attributes);
                map_chars(&mode, &tables.win_file_mode)
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// URLs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Top-level domains a host must end with to be taken as a URL.
pub static COMMON_TLDS: phf::Set<&'static str> = phf_set! {
    "com", "org", "net", "info", "biz", "xyz", "online", "site", "app", "dev", "io", "ai",
    "us", "uk", "ca", "au", "de", "fr", "jp", "cn", "in", "nl", "br", "edu", "gov", "mil", "int",
};

/// Leftmost host labels kept as-is, matched as a prefix, e.g. `www`,
/// `api2`, `mail01`.
pub const COMMON_SUBDOMAINS: [&str; 52] = [
    "www", "web", "home", "app", "api", "dev", "test", "staging", "beta", "docs", "developer",
    "developers", "auth", "login", "accounts", "id", "sso", "blog", "news", "media", "static", "cdn",
    "assets", "admin", "portal", "support", "help", "status", "dashboard", "mail", "smtp", "imap",
    "pop", "mx", "webmail", "vpn", "proxy", "gateway", "edge", "en", "fr", "de", "es", "vi", "ja",
    "zh", "us", "uk", "eu", "ca", "jp", "au",
];

pub const RP_URL: &str = concatcp!(
    r"(?i)^(?P<prefix>", CGP_PUNCT, r"*)",
    r"(?P<scheme>[a-z][a-z0-9+.-]*://)?",
    r"(?P<user>[^:@/]+(?::[^@/]+)?@)?",
    r"(?P<host>(?:[a-z][a-z0-9-]+\.)+[a-z][a-z0-9-]+)",
    r"(?::(?P<port>\d+))?",
    r"(?P<path>/[a-z0-9_./]+)?",
    r"(?P<query>\?[a-z0-9_.=&]+)?",
    r"(?P<fragment>#[a-z0-9_.%]+)?",
    r"(?P<suffix>", CGP_PUNCT, r"*)$",
);

lazy_static! {
    static ref RE_URL: Regex = Regex::new(RP_URL).unwrap();
    static ref RE_COMMON_SUBDOMAIN: Regex = Regex::new(
        &format!(r"(?i)^(?:{})[a-z0-9]*$", COMMON_SUBDOMAINS.join("|"))
    ).unwrap();
}

/// A recognized URL or bare host name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UrlNode {
    pub prefix: String,
    /// e.g. `https://`
    pub scheme: String,
    /// e.g. `user:pass@`
    pub user: String,
    pub host: String,
    /// digits only, without `:`
    pub port: String,
    pub path: String,
    pub query: String,
    pub fragment: String,
    pub suffix: String,
}

pub fn parse_url(text: &str) -> Option<UrlNode> {
    let caps = RE_URL.captures(text)?;
    let get = |name: &str| String::from(caps.name(name).map_or("", |m| m.as_str()));
    let host = get("host");
    let tld = host.rsplit('.').next()?.to_lowercase();
    if !COMMON_TLDS.contains(tld.as_str()) {
        return None;
    }

    Some(UrlNode {
        prefix: get("prefix"),
        scheme: get("scheme"),
        user: get("user"),
        host,
        port: get("port"),
        path: get("path"),
        query: get("query"),
        fragment: get("fragment"),
        suffix: get("suffix"),
    })
}

/// Is the leftmost `label` of a host a common subdomain, e.g. `www`?
pub fn is_common_subdomain(label: &str) -> bool {
    RE_COMMON_SUBDOMAIN.is_match(label)
}

impl UrlNode {
    fn generate_host<R: Rng + ?Sized>(
        &self,
        tables: &MappingTables,
        rng: &mut R,
    ) -> String {
        let labels: Vec<&str> = self.host.split('.').collect();
        let map = |label: &str, rng: &mut R| tables.apply_mapping(label, &tables.url.host, rng);
        match labels.as_slice() {
            [] | [_] => map(&self.host, rng),
            [domain, tld] => format!("{}.{}", map(*domain, rng), tld),
            [subdomain, middle @ .., tld] => {
                let subdomain = if is_common_subdomain(subdomain) {
                    String::from(*subdomain)
                } else {
                    map(*subdomain, rng)
                };
                let middle: Vec<String> = middle.iter().map(|label| map(*label, rng)).collect();
                format!("{}.{}.{}", subdomain, middle.join("."), tld)
            }
        }
    }

    pub fn generate_new<R: Rng + ?Sized>(
        &self,
        tables: &MappingTables,
        rng: &mut R,
    ) -> String {
        let user = tables.apply_mapping(&self.user, &tables.url.user, rng);
        let host = self.generate_host(tables, rng);
        let port = if self.port.is_empty() {
            String::new()
        } else {
            format!(":{}", self.port)
        };

        format!(
            "{}{}{}{}{}{}{}{}{}",
            self.prefix,
            self.scheme,
            user,
            host,
            port,
            tables.map_keep_escapes(&self.path, &tables.url.path),
            tables.map_keep_escapes(&self.query, &tables.url.query),
            tables.map_keep_escapes(&self.fragment, &tables.url.fragment),
            self.suffix,
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// numbers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const RP_NUMBER: &str = concatcp!(
    r"(?i)^(?P<prefix>[^\w\s]+?)?",
    r"(?P<number>\d+\.\d+|\.\d+|\d+\.|\d+)",
    r"(?P<suffix>[a-z]*", CGP_PUNCT, r"*)$",
);

lazy_static! {
    static ref RE_NUMBER: Regex = Regex::new(RP_NUMBER).unwrap();
    static ref RE_BINARY_DIGITS: Regex = Regex::new(r"^0[01]+$").unwrap();
    static ref RE_OCTAL_DIGITS: Regex = Regex::new(r"^0[0-7]+$").unwrap();
    static ref RE_LEADING_ZERO: Regex = Regex::new(r"^0[0-9]").unwrap();
}

/// A recognized number with its surrounding text, e.g. `(42ms),`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NumberNode {
    pub prefix: String,
    pub digits: String,
    pub suffix: String,
}

pub fn parse_number(text: &str) -> Option<NumberNode> {
    let caps = RE_NUMBER.captures(text)?;

    Some(NumberNode {
        prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
        digits: String::from(caps.name("number")?.as_str()),
        suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
    })
}

/// Replace a leading `0` followed by a digit with `first_digit`.
fn fix_leading_zero(
    number: String,
    first_digit: char,
) -> String {
    if RE_LEADING_ZERO.is_match(&number) {
        let mut fixed = String::with_capacity(number.len());
        fixed.push(first_digit);
        fixed.push_str(&number[1..]);
        return fixed;
    }

    number
}

/// Regenerate the digits of a number.
pub fn generate_number<R: Rng + ?Sized>(
    digits: &str,
    tables: &MappingTables,
    rng: &mut R,
) -> String {
    if let Some((base, fraction)) = digits.split_once('.') {
        if digits.parse::<f64>().map_or(false, |value| value == 0.0) {
            return String::from(digits);
        }
        let is_zero = |part: &str| !part.is_empty() && part.chars().all(|c| c == '0');
        let new_base = if is_zero(base) {
            String::from(base)
        } else {
            tables.apply_mapping(base, &tables.base_number, rng)
        };
        let new_fraction = if is_zero(fraction) {
            String::from(fraction)
        } else {
            map_chars(fraction, &tables.fraction_number)
        };
        return fix_leading_zero(format!("{}.{}", new_base, new_fraction), tables.first_digit);
    }
    if RE_BINARY_DIGITS.is_match(digits) {
        return generate_random_binary(digits.len(), rng);
    }
    if RE_OCTAL_DIGITS.is_match(digits) {
        return tables.apply_mapping(digits, &tables.octal, rng);
    }

    fix_leading_zero(tables.apply_mapping(digits, &tables.base_number, rng), tables.first_digit)
}

impl NumberNode {
    pub fn generate_new<R: Rng + ?Sized>(
        &self,
        tables: &MappingTables,
        rng: &mut R,
    ) -> String {
        format!("{}{}{}", self.prefix, generate_number(&self.digits, tables, rng), self.suffix)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// words
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// File extensions kept verbatim at the end of a word, e.g. `config.yaml`.
pub static KNOWN_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "7z", "apk", "asm", "avi", "awk", "bak", "bash", "bat", "bin", "bmp", "bz2", "c", "cab", "cc",
    "cfg", "cjs", "class", "cmake", "cmd", "conf", "config", "cpp", "crt", "cs", "csr", "css", "csv",
    "cxx", "dat", "db", "deb", "der", "diff", "dll", "dmg", "doc", "docx", "dockerfile", "dts",
    "dylib", "el", "elf", "env", "eot", "epub", "erl", "ex", "exe", "exs", "flac", "gif", "go",
    "gradle", "gz", "h", "hpp", "hs", "htm", "html", "ico", "img", "ini", "ipynb", "iso", "jar",
    "java", "jpeg", "jpg", "js", "json", "jsonl", "jsx", "key", "kt", "kts", "less", "lock", "log",
    "lua", "lz4", "lzma", "m", "m4a", "make", "md", "mjs", "mk", "mkv", "ml", "mov", "mp3", "mp4",
    "msi", "ndjson", "o", "obj", "odt", "ogg", "out", "p12", "patch", "pdf", "pem", "php", "pkg",
    "pl", "pm", "png", "ppt", "pptx", "properties", "proto", "ps1", "psd", "pub", "py", "pyc",
    "pyi", "r", "rar", "rb", "rpm", "rs", "rst", "rtf", "s", "sass", "scala", "scss", "service",
    "sh", "so", "socket", "sql", "sqlite", "svg", "swift", "sys", "tar", "tex", "tgz", "tif",
    "tiff", "tmp", "toml", "ts", "tsv", "tsx", "ttf", "txt", "vb", "vim", "vue", "war", "wasm",
    "wav", "webm", "webp", "whl", "woff", "woff2", "xhtml", "xls", "xlsx", "xml", "xz", "yaml",
    "yml", "zip", "zsh", "zst",
};

pub const RP_WORD: &str = concatcp!(
    r"^(?P<prefix>", CGP_PUNCT, r"+)?",
    r"(?P<core>\w+(?:", CGP_PUNCT, r"+\w+)*)",
    r"(?P<suffix>", CGP_PUNCT, r"+)?",
);

pub const RP_EXTENSION: &str = concatcp!(
    r#"(?i)[^\\/:*?"><|][.](?P<last>(?P<ext>[a-z0-9][a-z0-9_-]*)"#, CGP_PUNCT, r"*)$",
);

lazy_static! {
    static ref RE_WORD: Regex = Regex::new(RP_WORD).unwrap();
    static ref RE_EXTENSION: Regex = Regex::new(RP_EXTENSION).unwrap();
}

/// A recognized word, e.g. `"(hello-world)"`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WordNode {
    pub prefix: String,
    pub core: String,
    pub suffix: String,
    /// trailing text the word pattern did not consume, kept verbatim
    pub remainder: String,
}

pub fn parse_word(text: &str) -> Option<WordNode> {
    let caps = RE_WORD.captures(text)?;
    let matched = caps.get(0)?;

    Some(WordNode {
        prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
        core: String::from(caps.name("core")?.as_str()),
        suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
        remainder: String::from(&text[matched.end()..]),
    })
}

/// Regenerate `text`: a known trailing file extension is kept, the rest is
/// mapped segment by segment around punctuation runs.
pub fn generate_word<R: Rng + ?Sized>(
    text: &str,
    tables: &MappingTables,
    rng: &mut R,
) -> String {
    let (stem, kept) = match RE_EXTENSION.captures(text) {
        Some(caps) => match (caps.name("last"), caps.name("ext")) {
            (Some(last), Some(ext)) if KNOWN_EXTENSIONS.contains(ext.as_str().to_lowercase().as_str()) => {
                (&text[..last.start()], last.as_str())
            }
            _ => (text, ""),
        },
        None => (text, ""),
    };
    let mut out = String::with_capacity(text.len());
    for (at, segment) in split_keep(stem, &RE_PUNCT_RUN).into_iter().enumerate() {
        if at % 2 == 1 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        let map = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => &tables.letters,
            _ => &tables.alphanumeric,
        };
        out.push_str(&tables.apply_mapping(segment, map, rng));
    }
    out.push_str(kept);

    out
}

impl WordNode {
    pub fn generate_new<R: Rng + ?Sized>(
        &self,
        tables: &MappingTables,
        rng: &mut R,
    ) -> String {
        let text = format!("{}{}{}", self.prefix, self.core, self.suffix);
        let mut out = generate_word(&text, tables, rng);
        out.push_str(&self.remainder);

        out
    }
}
