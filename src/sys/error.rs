//! # Standard Error Codes (Errno)
//!
//! Códigos de erro na numeração da **newlib** (não a do Linux: `ENOSYS` é 88
//! aqui, e não 38). São os valores que o código C compara com `errno`.
//!
//! Valores negativos são usados no retorno dos stubs (`_open`, `_read`, ...).

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    EPERM = 1,         // Operation not permitted
    ENOENT = 2,        // No such file or directory
    EIO = 5,           // I/O error
    ENXIO = 6,         // No such device or address
    EBADF = 9,         // Bad file number
    EAGAIN = 11,       // Try again
    ENOMEM = 12,       // Out of memory
    EACCES = 13,       // Permission denied
    EFAULT = 14,       // Bad address
    EBUSY = 16,        // Device or resource busy
    EEXIST = 17,       // File exists
    ENODEV = 19,       // No such device
    ENOTDIR = 20,      // Not a directory
    EISDIR = 21,       // Is a directory
    EINVAL = 22,       // Invalid argument
    ENFILE = 23,       // File table overflow
    EMFILE = 24,       // Too many open files
    ENOTTY = 25,       // Not a typewriter
    ENOSPC = 28,       // No space left on device
    ESPIPE = 29,       // Illegal seek
    EROFS = 30,        // Read-only file system
    ENOSYS = 88,       // Function not implemented
    ENAMETOOLONG = 91, // File or path name too long
}

impl Errno {
    /// Valor positivo, como gravado em `errno`
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Forma negativa usada no retorno dos stubs
    pub const fn as_code(self) -> i32 {
        -(self as i32)
    }
}
