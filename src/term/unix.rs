pub fn init() {
    // intentionally left blank
}

/// Returns true if stdout is attached to a terminal rather than a file or pipe.
pub fn stdout_is_tty() -> bool { unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 } }
