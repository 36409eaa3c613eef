//! Testes do registro de dispositivos

#![cfg(test)]

use super::{all_caps, CallLog, MockDevice};
use crate::config::{MAX_DEVICES, MAX_DEV_NAME};
use crate::devices::{RomFile, RomFs};
use crate::devman::{
    Capabilities, DeviceManager, DeviceRegistry, DispatchError, DmError, OpenFlags,
};

static ROM_FILES: [RomFile; 2] = [
    RomFile::new("a.txt", b"aaa"),
    RomFile::new("b.txt", b"bbb"),
];

fn mock() -> Box<dyn crate::devman::Device> {
    MockDevice::new(all_caps(), &CallLog::default()).boxed()
}

#[test]
fn test_register_until_full() {
    let mut reg = DeviceRegistry::new();

    for i in 0..MAX_DEVICES {
        let name = format!("dev{}", i);
        assert_eq!(reg.register(&name, mock()), Ok(i));
    }
    assert_eq!(reg.count(), MAX_DEVICES);
    assert_eq!(reg.register("extra", mock()), Err(DmError::NoSpace));

    // Índices estáveis
    for i in 0..MAX_DEVICES {
        assert_eq!(reg.get_at(i).unwrap().name(), format!("dev{}", i));
    }
}

#[test]
fn test_register_duplicate_ignores_case() {
    let mut reg = DeviceRegistry::new();
    assert_eq!(reg.register("uart", mock()), Ok(0));
    assert_eq!(reg.register("UART", mock()), Err(DmError::AlreadyRegistered));
    assert_eq!(reg.count(), 1);
}

#[test]
fn test_register_invalid_names() {
    let mut reg = DeviceRegistry::new();
    let long = "x".repeat(MAX_DEV_NAME + 1);

    assert_eq!(reg.register("", mock()), Err(DmError::InvalidName));
    assert_eq!(reg.register(&long, mock()), Err(DmError::InvalidName));
    assert_eq!(reg.register("a/b", mock()), Err(DmError::InvalidName));
    assert_eq!(reg.register("//", mock()), Err(DmError::InvalidName));

    // Limites aceitos: raiz e exatamente MAX_DEV_NAME
    assert_eq!(reg.register("/", mock()), Ok(0));
    assert_eq!(reg.register(&"y".repeat(MAX_DEV_NAME), mock()), Ok(1));
}

#[test]
fn test_unregister() {
    let mut reg = DeviceRegistry::new();
    assert_eq!(reg.unregister("sd"), Err(DmError::NotRegistered));

    reg.register("sd", mock()).unwrap();
    assert_eq!(reg.unregister("SD"), Ok(()));
    assert_eq!(reg.count(), 0);
    assert!(reg.get_at(0).is_none());

    // Nome liberado para novo registro, no mesmo slot
    assert_eq!(reg.register("sd", mock()), Ok(0));
}

#[test]
fn test_get_at_out_of_range() {
    let reg = DeviceRegistry::new();
    assert!(reg.get_at(0).is_none());
    assert!(reg.get_at(MAX_DEVICES).is_none());
    assert!(reg.get_at(usize::MAX).is_none());
}

#[test]
fn test_record_capabilities() {
    let mut reg = DeviceRegistry::new();
    let log = CallLog::default();
    let partial = Capabilities::OPENDIR | Capabilities::READDIR;
    reg.register("half", MockDevice::new(partial, &log).boxed())
        .unwrap();

    let record = reg.get_at(0).unwrap();
    assert_eq!(record.capabilities(), partial);
    assert!(record.has(Capabilities::OPENDIR));
    assert!(!record.has_dir_support());
}

#[test]
fn test_iter_skips_free_slots() {
    let mut reg = DeviceRegistry::new();
    reg.register("a", mock()).unwrap();
    reg.register("b", mock()).unwrap();
    reg.register("c", mock()).unwrap();
    reg.unregister("b").unwrap();

    let names: Vec<_> = reg.iter().map(|(i, r)| (i, r.name().to_string())).collect();
    assert_eq!(names, vec![(0, "a".to_string()), (2, "c".to_string())]);
}

#[test]
fn test_unregister_with_open_descriptor_retires_slot() {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    dm.register("uart", MockDevice::new(all_caps(), &log).boxed())
        .unwrap();

    let fd = dm.open("/uart/0", OpenFlags::read_only(), 0).unwrap();
    assert_eq!(dm.get_at(0).unwrap().live(), 1);

    dm.unregister("uart").unwrap();
    assert!(dm.registry().is_retired(0));

    // Slot aposentado não é reaproveitado
    assert_eq!(
        dm.register("sd", MockDevice::new(all_caps(), &log).boxed()),
        Ok(1)
    );

    // Fechar o descritor antigo libera o slot
    assert!(dm.close(fd).is_err());
    assert!(!dm.registry().is_retired(0));
    assert_eq!(
        dm.register("uart", MockDevice::new(all_caps(), &log).boxed()),
        Ok(0)
    );
}

#[test]
fn test_init_is_idempotent() {
    let mut dm = DeviceManager::new();
    assert!(!dm.is_initialized());
    assert_eq!(dm.init(), Ok(()));
    assert_eq!(dm.init(), Ok(()));
    assert_eq!(dm.count(), 1);
    assert_eq!(dm.get_at(0).unwrap().name(), "std");

    dm.shutdown();
    assert_eq!(dm.count(), 0);
    assert!(!dm.is_initialized());
    assert_eq!(dm.init(), Ok(()));
    assert_eq!(dm.count(), 1);
}

#[test]
fn test_double_close_does_not_free_slot() {
    let log = CallLog::default();
    let mut dm = DeviceManager::new();
    dm.register("rom", Box::new(RomFs::new(&ROM_FILES))).unwrap();

    let fd1 = dm.open("/rom/a.txt", OpenFlags::read_only(), 0).unwrap();
    let fd2 = dm.open("/rom/b.txt", OpenFlags::read_only(), 0).unwrap();
    assert_ne!(fd1, fd2);

    assert_eq!(dm.close(fd1), Ok(()));
    assert_eq!(dm.close(fd1), Err(DispatchError::BadDescriptor));
    assert_eq!(dm.get_at(0).unwrap().live(), 1);

    // fd2 ainda aberto: o slot 0 não pode ser reaproveitado
    dm.unregister("rom").unwrap();
    assert!(dm.registry().is_retired(0));
    assert_eq!(
        dm.register("sd", MockDevice::new(all_caps(), &log).boxed()),
        Ok(1)
    );

    assert_eq!(dm.write(fd2, b"secret"), Err(DispatchError::StaleDescriptor));
    assert!(log.calls().is_empty());

    // Fechar fd1 de novo não drena o slot aposentado; fd2 drena
    assert_eq!(dm.close(fd1), Err(DispatchError::StaleDescriptor));
    assert!(dm.registry().is_retired(0));
    assert_eq!(dm.close(fd2), Err(DispatchError::StaleDescriptor));
    assert!(!dm.registry().is_retired(0));
}
