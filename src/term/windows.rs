use windows::Win32::System::Console::*;

pub fn init() {
    unsafe {
        // make sure VT escape sequences will be honored in the console
        let mut cm: CONSOLE_MODE = CONSOLE_MODE::default();
        if let Ok(h) = GetStdHandle(STD_ERROR_HANDLE) {
            GetConsoleMode(h, &mut cm as *mut CONSOLE_MODE);
            if (cm.0 & 0x4) == 0 {
                cm.0 |= 0x4;
                SetConsoleMode(h, cm);
            }
        }
    }
}

/// Returns true if stdout is attached to a console rather than a file or pipe.
pub fn stdout_is_tty() -> bool {
    unsafe {
        let mut cm: CONSOLE_MODE = CONSOLE_MODE::default();
        match GetStdHandle(STD_OUTPUT_HANDLE) {
            Ok(h) => GetConsoleMode(h, &mut cm as *mut CONSOLE_MODE).as_bool(),
            Err(_) => false,
        }
    }
}
