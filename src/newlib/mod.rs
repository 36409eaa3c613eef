//! # Newlib Stubs
//!
//! Entry points `extern "C"` que a newlib chama para I/O, processo e memória.
//! Todos delegam para um único [`DeviceManager`] global.
//!
//! Com a feature `newlib` os símbolos são exportados sem mangling (`_open`,
//! `_read`, ...). Sem ela continuam chamáveis do Rust, o que permite testá-los
//! no host sem colidir com a libc.
//!
//! # Convenção de retorno
//!
//! Falhas retornam o código negativo de [`DispatchError::as_code`] e gravam o
//! valor positivo correspondente em `errno`.


use alloc::boxed::Box;
use core::ffi::{c_char, c_int, c_long, c_void, CStr};
use core::ptr;
#[cfg(not(feature = "newlib"))]
use core::sync::atomic::{AtomicI32, Ordering};

use spin::{Mutex, RwLock};

use crate::config::{MAX_FNAME_LENGTH, MAX_OPEN_DIRS, STDOUT_NUM};
use crate::console;
use crate::devman::{
    Descriptor, Device, DeviceManager, DirHandle, DispatchError, DmError, DmResult, OpenFlags,
    PathError, SeekWhence,
};
use crate::sys::Errno;

/// Gerenciador usado pela camada C
static DEVMAN: Mutex<DeviceManager> = Mutex::new(DeviceManager::new());

// =============================================================================
// API RUST (PLATAFORMA)
// =============================================================================

/// Inicializa o gerenciador global (idempotente)
pub fn init() -> DmResult<()> {
    DEVMAN.lock().init()
}

/// Registra um dispositivo no gerenciador global
pub fn register(name: &str, device: Box<dyn Device>) -> DmResult<usize> {
    DEVMAN.lock().register(name, device)
}

pub fn unregister(name: &str) -> DmResult<()> {
    DEVMAN.lock().unregister(name)
}

/// Executa `f` com o gerenciador global travado
pub fn with_devman<R>(f: impl FnOnce(&mut DeviceManager) -> R) -> R {
    f(&mut DEVMAN.lock())
}

// =============================================================================
// ERRNO
// =============================================================================

#[cfg(feature = "newlib")]
extern "C" {
    fn __errno() -> *mut c_int;
}

#[cfg(feature = "newlib")]
pub fn set_errno(value: c_int) {
    // SAFETY: a newlib garante um ponteiro válido para o errno da reentrância atual
    unsafe { *__errno() = value }
}

#[cfg(feature = "newlib")]
pub fn errno() -> c_int {
    // SAFETY: idem
    unsafe { *__errno() }
}

#[cfg(not(feature = "newlib"))]
static ERRNO: AtomicI32 = AtomicI32::new(0);

#[cfg(not(feature = "newlib"))]
pub fn set_errno(value: c_int) {
    ERRNO.store(value, Ordering::Relaxed);
}

#[cfg(not(feature = "newlib"))]
pub fn errno() -> c_int {
    ERRNO.load(Ordering::Relaxed)
}

fn fail(err: DispatchError) -> c_int {
    crate::ktrace!("(NL) falha, errno=", err.errno_value());
    set_errno(err.errno_value());
    err.as_code()
}

fn fail_errno(errno: Errno) -> c_int {
    set_errno(errno.as_i32());
    errno.as_code()
}

// =============================================================================
// CONVERSÕES
// =============================================================================

/// # Safety
/// `name` deve ser nulo ou apontar para uma string C terminada em NUL.
unsafe fn c_path<'a>(name: *const c_char) -> Result<&'a str, DispatchError> {
    if name.is_null() {
        return Err(DispatchError::Resolution(PathError::Empty));
    }
    CStr::from_ptr(name)
        .to_str()
        .map_err(|_| DispatchError::Resolution(PathError::NotAbsolute))
}

fn descriptor(file: c_int) -> Result<Descriptor, DispatchError> {
    Descriptor::from_raw(file).map_err(|_| DispatchError::BadDescriptor)
}

// =============================================================================
// ARQUIVOS
// =============================================================================

/// # Safety
/// `name` deve ser nulo ou uma string C válida.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _open_creat(name: *const c_char, flags: c_int, mode: c_int) -> c_int {
    let path = match c_path(name) {
        Ok(path) => path,
        Err(e) => return fail(e),
    };

    match DEVMAN
        .lock()
        .open(path, OpenFlags(flags as u32), mode as u32)
    {
        Ok(desc) => desc.as_raw(),
        Err(e) => fail(e),
    }
}

/// # Safety
/// Ver [`_open_creat`].
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _open(name: *const c_char, flags: c_int) -> c_int {
    _open_creat(name, flags, 0)
}

/// # Safety
/// Ver [`_open_creat`].
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _creat(name: *const c_char, mode: c_int) -> c_int {
    _open_creat(name, 0, mode)
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _close(file: c_int) -> c_int {
    match descriptor(file).and_then(|desc| DEVMAN.lock().close(desc)) {
        Ok(()) => 0,
        Err(e) => fail(e),
    }
}

/// # Safety
/// `ptr` deve ser válido para escrita de `len` bytes.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _read(file: c_int, ptr: *mut c_void, len: usize) -> isize {
    if ptr.is_null() && len > 0 {
        return fail_errno(Errno::EFAULT) as isize;
    }
    let buf: &mut [u8] = if len == 0 {
        &mut []
    } else {
        core::slice::from_raw_parts_mut(ptr.cast::<u8>(), len)
    };

    match descriptor(file).and_then(|desc| DEVMAN.lock().read(desc, buf)) {
        Ok(count) => count as isize,
        Err(e) => fail(e) as isize,
    }
}

/// # Safety
/// `ptr` deve ser válido para leitura de `len` bytes.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _write(file: c_int, ptr: *const c_void, len: usize) -> isize {
    if ptr.is_null() && len > 0 {
        return fail_errno(Errno::EFAULT) as isize;
    }
    let buf: &[u8] = if len == 0 {
        &[]
    } else {
        core::slice::from_raw_parts(ptr.cast::<u8>(), len)
    };

    match descriptor(file).and_then(|desc| DEVMAN.lock().write(desc, buf)) {
        Ok(count) => count as isize,
        Err(e) => fail(e) as isize,
    }
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _lseek(file: c_int, off: c_long, whence: c_int) -> c_long {
    let Some(whence) = SeekWhence::from_raw(whence) else {
        return fail_errno(Errno::EINVAL) as c_long;
    };

    let result = descriptor(file)
        .and_then(|desc| DEVMAN.lock().seek(desc, off as i64, whence));
    match result {
        Ok(pos) => match c_long::try_from(pos) {
            Ok(pos) => pos,
            Err(_) => fail_errno(Errno::EINVAL) as c_long,
        },
        Err(e) => fail(e) as c_long,
    }
}

/// Início de `struct stat` da newlib: só `st_mode` é preenchido
#[repr(C)]
pub struct StatPrefix {
    pub st_dev: i16,
    pub st_ino: u16,
    pub st_mode: u32,
}

/// # Safety
/// `st` deve ser nulo ou apontar para uma `struct stat` da newlib.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn _fstat(file: c_int, st: *mut StatPrefix) -> c_int {
    match DEVMAN.lock().fstat(file) {
        Ok(stat) => {
            if !st.is_null() {
                ptr::addr_of_mut!((*st).st_mode).write(stat.mode);
            }
            0
        }
        Err(e) => fail(e),
    }
}

// =============================================================================
// DIRETÓRIOS
// =============================================================================

/// Entrada de diretório para C
#[repr(C)]
pub struct DmDirent {
    pub fsize: u32,
    /// Nome terminado em NUL (truncado em `MAX_FNAME_LENGTH`)
    pub fname: [c_char; MAX_FNAME_LENGTH + 1],
    pub ftime: u32,
}

/// Diretórios abertos pela camada C; o número do slot é o handle em C
static DIRS: Mutex<[Option<DirHandle>; MAX_OPEN_DIRS]> = {
    const NONE: Option<DirHandle> = None;
    Mutex::new([NONE; MAX_OPEN_DIRS])
};

/// Abre um diretório. Retorna o número do slot ou um código negativo.
///
/// # Safety
/// `name` deve ser nulo ou uma string C válida.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn dm_opendir(name: *const c_char) -> c_int {
    let path = match c_path(name) {
        Ok(path) => path,
        Err(e) => return fail(e),
    };

    let mut devman = DEVMAN.lock();
    let mut dirs = DIRS.lock();
    let Some(slot) = dirs.iter().position(Option::is_none) else {
        return fail_errno(Errno::ENFILE);
    };

    match devman.opendir(path) {
        Ok(dir) => {
            dirs[slot] = Some(dir);
            slot as c_int
        }
        Err(e) => fail(e),
    }
}

/// Lê a próxima entrada em `out`. Retorna 1 com entrada, 0 no fim.
///
/// # Safety
/// `out` deve apontar para um `DmDirent` gravável.
#[cfg_attr(feature = "newlib", no_mangle)]
pub unsafe extern "C" fn dm_readdir(dir: c_int, out: *mut DmDirent) -> c_int {
    if out.is_null() {
        return fail_errno(Errno::EFAULT);
    }

    let mut devman = DEVMAN.lock();
    let dirs = DIRS.lock();
    let Some(Some(handle)) = usize::try_from(dir).ok().and_then(|i| dirs.get(i)) else {
        return fail(DispatchError::BadDescriptor);
    };

    let Some(entry) = devman.readdir(handle) else {
        return 0;
    };

    let mut fname = [0 as c_char; MAX_FNAME_LENGTH + 1];
    for (dst, &src) in fname
        .iter_mut()
        .zip(entry.name.as_bytes().iter().take(MAX_FNAME_LENGTH))
    {
        *dst = src as c_char;
    }
    out.write(DmDirent {
        fsize: entry.size,
        fname,
        ftime: entry.mtime,
    });
    1
}

/// Fecha o diretório. Fechar duas vezes retorna -1 (EBADF), sem travar.
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn dm_closedir(dir: c_int) -> c_int {
    let mut devman = DEVMAN.lock();
    let handle = usize::try_from(dir)
        .ok()
        .and_then(|i| DIRS.lock().get_mut(i).and_then(Option::take));

    let Some(handle) = handle else {
        set_errno(Errno::EBADF.as_i32());
        return -1;
    };

    match devman.closedir(handle) {
        Ok(()) => 0,
        Err(e) => fail(e),
    }
}

/// `DM_OK` ou `DM_ERR_*`
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn dm_init() -> c_int {
    DmError::result_code(&init())
}

// =============================================================================
// CONSOLE
// =============================================================================

/// Envio da plataforma: `(descritor, caractere)`
pub type StdSendFn = extern "C" fn(c_int, c_char);
/// Recepção da plataforma: caractere ou negativo se indisponível
pub type StdGetFn = extern "C" fn() -> c_int;

static C_SEND: RwLock<Option<StdSendFn>> = RwLock::new(None);
static C_GET: RwLock<Option<StdGetFn>> = RwLock::new(None);

fn send_adapter(byte: u8) {
    let send = *C_SEND.read();
    if let Some(send) = send {
        send(STDOUT_NUM, byte as c_char);
    }
}

fn get_adapter() -> Option<u8> {
    let get = *C_GET.read();
    let c = get?();
    u8::try_from(c).ok()
}

/// Instala (ou remove, com NULL) a função de envio do console
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn std_set_send_func(func: Option<StdSendFn>) {
    *C_SEND.write() = func;
    console::set_send(func.map(|_| send_adapter as console::SendFn));
}

/// Instala (ou remove, com NULL) a função de recepção do console
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn std_set_get_func(func: Option<StdGetFn>) {
    *C_GET.write() = func;
    console::set_recv(func.map(|_| get_adapter as console::RecvFn));
}

// =============================================================================
// PROCESSO / TEMPO
// =============================================================================

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _isatty(_fd: c_int) -> c_int {
    1
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn isatty(_fd: c_int) -> c_int {
    1
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _getpid() -> c_int {
    0
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn getpid() -> c_int {
    0
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _times_r(_buf: *mut c_void) -> c_long {
    0
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _unlink_r(_name: *const c_char) -> c_int {
    set_errno(Errno::ENOSYS.as_i32());
    -1
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _link_r(_old: *const c_char, _new: *const c_char) -> c_int {
    set_errno(Errno::ENOSYS.as_i32());
    -1
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _gettimeofday_r(_tv: *mut c_void, _tz: *mut c_void) -> c_int {
    set_errno(Errno::ENOSYS.as_i32());
    -1
}

#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _kill(_pid: c_int, _sig: c_int) -> c_int {
    -1
}

/// Sem processo para encerrar: fica parado aqui
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _exit(_status: c_int) -> ! {
    crate::kwarn!("(NL) _exit chamado, parando");
    loop {
        core::hint::spin_loop();
    }
}

// =============================================================================
// MEMÓRIA
// =============================================================================

/// `(void*)-1` em caso de falha, com `errno = ENOMEM`
#[cfg_attr(feature = "newlib", no_mangle)]
pub extern "C" fn _sbrk(incr: isize) -> *mut c_void {
    match crate::mm::SBRK.lock().sbrk(incr) {
        Ok(brk) => brk as *mut c_void,
        Err(errno) => {
            set_errno(errno.as_i32());
            usize::MAX as *mut c_void
        }
    }
}
