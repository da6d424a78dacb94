#![allow(unused_macros, dead_code)]
// Progress output goes to stderr; stdout may be carrying the emitted table.
macro_rules! verbose_println {
    ($($p:expr),+) => {
        if (config::ARGS.verbose) {
            eprintln!($($p),+);
        }
    }
}
macro_rules! info {
    ($($p:expr),+) => {
        eprintln!(concat!(blue!("INFO"),": {}"),format_args!($($p),+))
    }
}

macro_rules! warn {
    ($($p:expr),+) => {
        eprintln!(concat!(red!("WARNING"),": {}"),format_args!($($p),+))
    }
}
macro_rules! general_err {
    ($msg:expr) => {
        Error::new(crate::ErrorKind::General, None, format!("{}", $msg).as_str())
    };
}
macro_rules! mode_err {
    ($($msg:expr),*) => {
        Error::new(
            crate::ErrorKind::InvalidAddressingMode,
            None,
            format!("{} {}", red!("Invalid addressing mode"), format!($($msg),*)).as_str(),
        )
    };
}
macro_rules! inst_err {
    ($($msg:expr),*) => {
        Error::new(
            crate::ErrorKind::InvalidInstruction,
            None,
            format!("{} {}", red!("Invalid instruction"), format!($($msg),*)).as_str(),
        )
    };
}
macro_rules! descriptor_err_line {
    ($line:expr, $msg:expr) => {
        Error::new(
            crate::ErrorKind::Descriptor,
            None,
            format!("{}, line {}: {}", red!("Descriptor Error"), $line, $msg).as_str(),
        )
    };
}
macro_rules! check_err {
    ($($msg:expr),*) => {
        Error::new(
            crate::ErrorKind::Check,
            None,
            format!("{} {}", red!("Check Failed"), format!($($msg),*)).as_str(),
        )
    };
}
macro_rules! color {
    ($color: literal, $msg: expr) => {
        concat!("\x1b[", $color, "m", $msg, "\x1b[0m")
    };
}
macro_rules! red {
    ($msg:expr) => {
        color!(91, $msg)
    };
}
macro_rules! blue {
    ($msg:expr) => {
        color!(94, $msg)
    };
}
