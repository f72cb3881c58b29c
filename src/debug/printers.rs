// src/debug/printers.rs

//! A hodge-podge of printer functions and helpers for test and debug builds.

#![allow(non_snake_case)]

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! an `err`or
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("ERROR: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_err;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `warn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// "raw" printing helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transform ASCII control character `c` to its Unicode "pictures" form.
///
/// Unicode "Control Pictures" block starts at `U+2400`. A newline `'\n'`
/// becomes `'␊'`, a tab `'\t'` becomes `'␉'`, DEL becomes `'␡'`.
/// Other characters are returned as-is.
pub const fn char_to_char_noraw(c: char) -> char {
    if c as u32 <= 0x1F {
        match char::from_u32(0x2400 + c as u32) {
            Some(c_) => c_,
            None => c,
        }
    } else if c as u32 == 0x7F {
        '␡'
    } else {
        c
    }
}

/// Transform `&str` to a `String` with control characters replaced by
/// their "pictures" form, for readable trace output of line content.
pub fn str_to_String_noraw(s: &str) -> String {
    s.chars()
        .map(char_to_char_noraw)
        .collect()
}

