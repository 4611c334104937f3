/// Macros for properly formatted console logging.
///
/// In the browser these wrap gloo_console and prefix every line with a
/// `js_sys::Date::now()` timestamp. Outside wasm32 (unit tests, tooling) there
/// is no JavaScript host to call into, so they forward to `tracing` instead.
#[macro_export]
macro_rules! console_info {
    ($fmt:expr) => {
        $crate::__console_dispatch!(info, $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::__console_dispatch!(info, format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! console_log {
    ($fmt:expr) => {
        $crate::__console_dispatch!(log, $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::__console_dispatch!(log, format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! console_warn {
    ($fmt:expr) => {
        $crate::__console_dispatch!(warn, $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::__console_dispatch!(warn, format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! console_error {
    ($fmt:expr) => {
        $crate::__console_dispatch!(error, $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::__console_dispatch!(error, format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! console_debug {
    ($fmt:expr) => {
        $crate::__console_dispatch!(debug, $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::__console_dispatch!(debug, format!($fmt, $($arg)*))
    };
}

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! __console_dispatch {
    (info, $msg:expr) => {
        $crate::__reexports::gloo_console::info!(format!("[{}] {}", $crate::__reexports::js_sys::Date::now(), $msg))
    };
    (log, $msg:expr) => {
        $crate::__reexports::gloo_console::log!(format!("[{}] {}", $crate::__reexports::js_sys::Date::now(), $msg))
    };
    (warn, $msg:expr) => {
        $crate::__reexports::gloo_console::warn!(format!("[{}] {}", $crate::__reexports::js_sys::Date::now(), $msg))
    };
    (error, $msg:expr) => {
        $crate::__reexports::gloo_console::error!(format!("[{}] {}", $crate::__reexports::js_sys::Date::now(), $msg))
    };
    (debug, $msg:expr) => {
        $crate::__reexports::gloo_console::debug!(format!("[{}] {}", $crate::__reexports::js_sys::Date::now(), $msg))
    };
}

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! __console_dispatch {
    (info, $msg:expr) => {
        $crate::__reexports::tracing::info!("{}", $msg)
    };
    (log, $msg:expr) => {
        $crate::__reexports::tracing::info!("{}", $msg)
    };
    (warn, $msg:expr) => {
        $crate::__reexports::tracing::warn!("{}", $msg)
    };
    (error, $msg:expr) => {
        $crate::__reexports::tracing::error!("{}", $msg)
    };
    (debug, $msg:expr) => {
        $crate::__reexports::tracing::debug!("{}", $msg)
    };
}
