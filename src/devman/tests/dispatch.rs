//! Testes do dispatcher de I/O

#![cfg(test)]

use super::{all_caps, manager_with, Call, CallLog, MockDevice};
use crate::devman::{
    Capabilities, Descriptor, DeviceError, DeviceManager, DispatchError, FileStat, OpenFlags,
    Operation, PathError, SeekWhence,
};
use crate::config::MAX_OPEN_HANDLES;
use crate::devices::NullDevice;
use crate::sys::Errno;

fn open_read_write() -> Capabilities {
    Capabilities::OPEN | Capabilities::READ | Capabilities::WRITE
}

#[test]
fn test_open_close_end_to_end() {
    let (mut dm, log) = manager_with(&[("std", all_caps()), ("A", all_caps())]);

    let fd = dm.open("/a/x", OpenFlags(0x0202), 0o644).unwrap();
    assert_eq!(fd.decode(), (1, 5));
    assert_eq!(log.last(), Some(Call::Open("x".into(), 0x0202, 0o644)));

    assert_eq!(dm.close(fd), Ok(()));
    assert_eq!(log.last(), Some(Call::Close(5)));
    assert_eq!(dm.get_at(1).unwrap().live(), 0);
}

#[test]
fn test_read_write_forward_unchanged() {
    let (mut dm, log) = manager_with(&[("uart", open_read_write())]);
    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(dm.read(fd, &mut buf), Ok(4));
    assert_eq!(&buf, b"rrrr");
    assert_eq!(log.last(), Some(Call::Read(5, 4)));

    assert_eq!(dm.write(fd, b"hello"), Ok(5));
    assert_eq!(log.last(), Some(Call::Write(5, b"hello".to_vec())));
}

#[test]
fn test_missing_capability_is_enosys() {
    let (mut dm, log) = manager_with(&[("uart", open_read_write())]);
    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();
    let before = log.calls().len();

    let err = dm.seek(fd, 10, SeekWhence::Set).unwrap_err();
    assert_eq!(err, DispatchError::NotSupported(Operation::Seek));
    assert_eq!(err.as_code(), -88);

    let err = dm.close(fd).unwrap_err();
    assert_eq!(err, DispatchError::NotSupported(Operation::Close));
    assert_eq!(err.as_code(), Errno::ENOSYS.as_code());

    // Nada chegou ao dispositivo
    assert_eq!(log.calls().len(), before);
}

#[test]
fn test_open_without_capability() {
    let (mut dm, log) = manager_with(&[("ro", Capabilities::READ)]);
    assert_eq!(
        dm.open("/ro/x", OpenFlags::read_only(), 0),
        Err(DispatchError::NotSupported(Operation::Open))
    );
    assert!(log.calls().is_empty());
}

#[test]
fn test_open_resolution_errors() {
    let (mut dm, _) = manager_with(&[("uart", all_caps())]);

    let err = dm.open("/sd/x", OpenFlags::read_only(), 0).unwrap_err();
    assert_eq!(err, DispatchError::Resolution(PathError::NoDevice));
    assert_eq!(err.as_code(), Errno::ENODEV.as_code());

    let err = dm.open("relativo", OpenFlags::read_only(), 0).unwrap_err();
    assert_eq!(err.as_code(), Errno::EINVAL.as_code());
}

#[test]
fn test_device_error_passes_through() {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    dm.register("sd", MockDevice::new(all_caps(), &log).failing_open(-1234).boxed())
        .unwrap();

    let err = dm.open("/sd/x", OpenFlags::read_only(), 0).unwrap_err();
    assert_eq!(err, DispatchError::Device(DeviceError(-1234)));
    assert_eq!(err.as_code(), -1234);
    assert_eq!(dm.get_at(0).unwrap().live(), 0);
}

#[test]
fn test_non_negative_device_error_becomes_eio() {
    let err = DispatchError::Device(DeviceError(3));
    assert_eq!(err.as_code(), Errno::EIO.as_code());
    assert_eq!(err.errno_value(), Errno::EIO.as_i32());
}

#[test]
fn test_handle_overflow_closes_handle() {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    dm.register("big", MockDevice::new(all_caps(), &log).with_handle(4096).boxed())
        .unwrap();

    let err = dm.open("/big/x", OpenFlags::read_only(), 0).unwrap_err();
    assert_eq!(err, DispatchError::HandleOverflow);
    assert_eq!(err.as_code(), Errno::EMFILE.as_code());
    assert_eq!(log.last(), Some(Call::Close(4096)));
    assert_eq!(dm.get_at(0).unwrap().live(), 0);
}

#[test]
fn test_stale_descriptor() {
    let (mut dm, _) = manager_with(&[("uart", all_caps())]);

    // Índice nunca registrado
    let ghost = Descriptor::encode(9, 1).unwrap();
    let mut buf = [0u8; 1];
    assert_eq!(dm.read(ghost, &mut buf), Err(DispatchError::StaleDescriptor));
    assert_eq!(dm.close(ghost), Err(DispatchError::StaleDescriptor));

    // Dispositivo desregistrado com descritor aberto
    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();
    dm.unregister("uart").unwrap();
    assert_eq!(dm.write(fd, b"x"), Err(DispatchError::StaleDescriptor));
    assert_eq!(
        DispatchError::StaleDescriptor.as_code(),
        Errno::EBADF.as_code()
    );
}

#[test]
fn test_seek_forwards_whence() {
    let (mut dm, log) = manager_with(&[("sd", all_caps())]);
    let fd = dm.open("/sd/f", OpenFlags::read_only(), 0).unwrap();

    assert_eq!(dm.seek(fd, 42, SeekWhence::End), Ok(42));
    assert_eq!(log.last(), Some(Call::Seek(5, 42, SeekWhence::End)));
}

#[test]
fn test_fstat_standard_streams_only() {
    let dm = DeviceManager::new();
    for raw in 0..=2 {
        assert_eq!(dm.fstat(raw), Ok(FileStat::char_device()));
    }
    assert_eq!(
        dm.fstat(3),
        Err(DispatchError::NotSupported(Operation::Stat))
    );
    assert!(dm.fstat(-1).is_err());
}

#[test]
fn test_standard_streams_route_to_std() {
    let cap = crate::console::capture::install();
    let mut dm = DeviceManager::new();
    dm.init().unwrap();

    let stdout = Descriptor::from_raw(1).unwrap();
    assert_eq!(dm.write(stdout, b"oi\n"), Ok(3));
    assert!(cap.take_output().ends_with(b"oi\r\n"));
}

#[test]
fn test_close_twice_is_bad_descriptor() {
    let (mut dm, log) = manager_with(&[("uart", all_caps())]);
    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();

    assert_eq!(dm.close(fd), Ok(()));
    assert_eq!(dm.close(fd), Err(DispatchError::BadDescriptor));
    assert_eq!(dm.close(fd).unwrap_err().as_code(), Errno::EBADF.as_code());

    // Só o primeiro close chegou ao dispositivo
    let closes = log.calls().iter().filter(|c| **c == Call::Close(5)).count();
    assert_eq!(closes, 1);
}

#[test]
fn test_close_never_opened_handle() {
    let (mut dm, log) = manager_with(&[("uart", all_caps())]);
    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();

    let forged = Descriptor::encode(0, 3).unwrap();
    assert_eq!(dm.close(forged), Err(DispatchError::BadDescriptor));
    assert_eq!(dm.get_at(0).unwrap().live(), 1);
    assert!(!log.calls().contains(&Call::Close(3)));

    assert_eq!(dm.close(fd), Ok(()));
}

#[test]
fn test_same_handle_opened_twice() {
    let mut dm = DeviceManager::new();
    dm.register("null", Box::new(NullDevice::new())).unwrap();

    // O null devolve sempre o handle 0
    let a = dm.open("/null/a", OpenFlags::read_only(), 0).unwrap();
    let b = dm.open("/null/b", OpenFlags::read_only(), 0).unwrap();
    assert_eq!(a, b);
    assert_eq!(dm.get_at(0).unwrap().live(), 2);

    assert_eq!(dm.close(a), Ok(()));
    assert_eq!(dm.close(b), Ok(()));
    assert_eq!(dm.close(a), Err(DispatchError::BadDescriptor));
    assert_eq!(dm.get_at(0).unwrap().live(), 0);
}

#[test]
fn test_open_handle_table_full() {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    dm.register("sd", MockDevice::new(all_caps(), &log).with_handle(0).sequential().boxed())
        .unwrap();

    for _ in 0..MAX_OPEN_HANDLES {
        dm.open("/sd/f", OpenFlags::read_only(), 0).unwrap();
    }
    let err = dm.open("/sd/f", OpenFlags::read_only(), 0).unwrap_err();
    assert_eq!(err, DispatchError::HandleOverflow);
    assert_eq!(log.last(), Some(Call::Close(MAX_OPEN_HANDLES as u32)));
    assert_eq!(dm.get_at(0).unwrap().live(), MAX_OPEN_HANDLES);
}

#[test]
fn test_standard_streams_close_once() {
    let _cap = crate::console::capture::install();
    let mut dm = DeviceManager::new();
    dm.init().unwrap();

    let stdout = Descriptor::from_raw(1).unwrap();
    assert_eq!(dm.close(stdout), Ok(()));
    assert_eq!(dm.close(stdout), Err(DispatchError::BadDescriptor));

    // stdin e stderr continuam abertos
    assert_eq!(dm.get_at(0).unwrap().live(), 2);
}

#[test]
fn test_device_error_without_errno() {
    let err = DispatchError::Device(DeviceError(i32::MIN));
    assert_eq!(err.as_code(), Errno::EIO.as_code());
    assert_eq!(err.errno_value(), Errno::EIO.as_i32());
}
