//! Surfaces driver errors at the call which raised them.

use super::backends::Visitor;
use crate::errors::*;

/// Upper bound of stale errors drained before a call. A lost context keeps
/// reporting errors forever, so the drain can not loop until the queue is empty.
pub const MAX_DRAINED_ERRORS: usize = 64;

/// Wraps a driver call with `Device::call`, capturing the stringified call and its
/// location.
///
/// ```rust,ignore
/// probe!(self.device, v => v.bind_buffer(BufferTarget::Array, id))?;
/// ```
#[macro_export]
macro_rules! probe {
    ($device:expr, $visitor:ident => $call:expr) => {
        $device.call(stringify!($call), file!(), line!(), |$visitor| unsafe { $call })
    };
}

/// Drains any error raised before the operation we are about to probe, so it is
/// not blamed on the wrong call.
pub fn clear(visitor: &mut dyn Visitor) -> usize {
    let mut drained = 0;
    while drained < MAX_DRAINED_ERRORS {
        let code = unsafe { visitor.get_error() };
        if code == gl::NO_ERROR {
            break;
        }

        debug!("[OpenGL] Drains stale error ({}): {}", code, describe(code));
        drained += 1;
    }

    drained
}

/// Polls the error queue once after `operation` was performed.
pub fn check(
    visitor: &mut dyn Visitor,
    operation: &'static str,
    file: &'static str,
    line: u32,
) -> Result<()> {
    let code = unsafe { visitor.get_error() };
    if code == gl::NO_ERROR {
        return Ok(());
    }

    error!("[OpenGL Error] ({}): {} {}:{}", code, operation, file, line);
    Err(Error::Driver {
        code,
        description: describe(code),
        operation,
        file,
        line,
    })
}

/// Drains stale errors, performs `operation` and reports the first error it raised.
pub fn wrap<T, F>(
    visitor: &mut dyn Visitor,
    operation: &'static str,
    file: &'static str,
    line: u32,
    f: F,
) -> Result<T>
where
    F: FnOnce(&mut dyn Visitor) -> T,
{
    clear(visitor);
    let v = f(&mut *visitor);
    check(visitor, operation, file, line)?;
    Ok(v)
}

/// Returns a human readable description of a driver error code.
pub fn describe(code: u32) -> &'static str {
    match code {
        gl::NO_ERROR => "No error has been recorded.",
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        gl::STACK_UNDERFLOW => "An attempt has been made to perform an operation that would \
                                cause an internal stack to underflow.",
        gl::STACK_OVERFLOW => "An attempt has been made to perform an operation that would \
                               cause an internal stack to overflow.",
        _ => "Oops, Unknown OpenGL error.",
    }
}

#[cfg(test)]
mod test {
    use super::super::backends::headless::HeadlessVisitor;
    use super::*;

    #[test]
    fn drains_stale_errors() {
        let mut visitor = HeadlessVisitor::new();
        let stats = visitor.stats();
        stats.inject_error(gl::INVALID_ENUM);
        stats.inject_error(gl::INVALID_VALUE);

        assert_eq!(clear(&mut visitor), 2);
        assert!(check(&mut visitor, "noop", file!(), line!()).is_ok());
    }

    #[test]
    fn drain_is_bounded() {
        let mut visitor = HeadlessVisitor::new();
        let stats = visitor.stats();
        for _ in 0..(MAX_DRAINED_ERRORS + 8) {
            stats.inject_error(gl::OUT_OF_MEMORY);
        }

        assert_eq!(clear(&mut visitor), MAX_DRAINED_ERRORS);
    }

    #[test]
    fn describes_unknown_codes() {
        assert_eq!(describe(0xDEAD), "Oops, Unknown OpenGL error.");
        assert!(describe(gl::INVALID_OPERATION).contains("current state"));
    }
}
