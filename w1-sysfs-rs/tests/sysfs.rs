use std::{convert::Infallible, fs, path::Path};

use tempfile::TempDir;
use w1_sysfs::{
    Address, OneWireBus, OneWireBusCloser, Platform, Pullup, Registrar, W1Sysfs, W1SysfsBuilder,
    W1SysfsError, W1SysfsOpener,
};

/// A fake `/sys/devices` with two devices on bus 1 and an empty bus 2.
fn sysfs_tree() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let master = root.path().join("w1_bus_master1");
    for device in ["28-04170328afff", "10-0000000001aa"] {
        fs::create_dir_all(master.join(device)).unwrap();
        fs::write(master.join(device).join("rw"), b"").unwrap();
    }
    fs::write(master.join("w1_master_pullup"), b"").unwrap();
    fs::write(master.join("uevent"), b"").unwrap();
    fs::create_dir_all(root.path().join("w1_bus_master2")).unwrap();
    fs::write(root.path().join("w1_bus_master2").join("w1_master_pullup"), b"").unwrap();
    fs::create_dir_all(root.path().join("w1_bus_master_stale")).unwrap();
    fs::create_dir_all(root.path().join("platform")).unwrap();
    root
}

fn builder(root: &Path) -> W1SysfsBuilder {
    W1SysfsBuilder::default()
        .with_root(root)
        .with_platform(Platform::Supported)
}

fn open(root: &Path, bus: u32) -> W1Sysfs {
    builder(root).open(bus).unwrap()
}

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0x55];
    frame.extend_from_slice(&Address::new(0xc104170328afff28).to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}

#[test]
fn strong_pullup_writes_zero() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    bus.tx(&frame(&[0x44]), &mut [], Pullup::Strong).unwrap();
    let pullup = fs::read(root.path().join("w1_bus_master1/w1_master_pullup")).unwrap();
    assert_eq!(pullup, b"0");
}

#[test]
fn normal_pullup_writes_one() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    bus.tx(&frame(&[0xbe]), &mut [], Pullup::Normal).unwrap();
    let pullup = fs::read(root.path().join("w1_bus_master1/w1_master_pullup")).unwrap();
    assert_eq!(pullup, b"1");
}

#[test]
fn payload_reaches_device_and_response_is_read() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    let mut read = [0u8; 4];
    bus.tx(&frame(&[0x4e, 0x4b, 0x46]), &mut read, Pullup::Normal)
        .unwrap();
    let rw = fs::read(root.path().join("w1_bus_master1/28-04170328afff/rw")).unwrap();
    // A regular file plays the device back.
    assert_eq!(rw, [0x4e, 0x4b, 0x46]);
    assert_eq!(read, [0x4e, 0x4b, 0x46, 0x00]);
}

#[test]
fn header_is_not_transmitted() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    bus.tx(&frame(&[]), &mut [], Pullup::Normal).unwrap();
    let rw = fs::read(root.path().join("w1_bus_master1/28-04170328afff/rw")).unwrap();
    assert!(rw.is_empty());
}

#[test]
fn transfer_to_absent_device_fails() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    let mut frame = frame(&[0x44]);
    frame[1] = 0x3b;
    match bus.tx(&frame, &mut [], Pullup::Normal) {
        Err(W1SysfsError::Io { path, .. }) => {
            assert_eq!(path, root.path().join("w1_bus_master1/3b-04170328afff/rw"));
        }
        other => panic!("unexpected result {other:?}"),
    }
    // The pull-up write of the failed transfer stays.
    let pullup = fs::read(root.path().join("w1_bus_master1/w1_master_pullup")).unwrap();
    assert_eq!(pullup, b"1");
}

#[test]
fn transfer_on_missing_bus_fails() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 9);
    assert!(matches!(
        bus.tx(&frame(&[0x44]), &mut [], Pullup::Normal),
        Err(W1SysfsError::Io { .. })
    ));
}

#[test]
fn search_lists_devices() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    let devices = OneWireBus::search(&mut bus, false).unwrap();
    assert_eq!(
        devices,
        [
            Address::new(0x3f0000000001aa10),
            Address::new(0xc104170328afff28)
        ]
    );
    assert!(devices.iter().all(Address::has_valid_crc));
    OneWireBusCloser::close(&mut bus).unwrap();
}

#[test]
fn alarm_search_lists_all_devices() {
    let root = sysfs_tree();
    let mut bus = open(root.path(), 1);
    assert_eq!(bus.search(true).unwrap(), bus.search(false).unwrap());
}

#[test]
fn search_on_empty_bus() {
    let root = sysfs_tree();
    assert!(matches!(
        open(root.path(), 2).search(false),
        Err(W1SysfsError::NoDeviceFound)
    ));
    assert!(matches!(
        open(root.path(), 5).search(false),
        Err(W1SysfsError::NoDeviceFound)
    ));
}

#[derive(Default)]
struct Table(Vec<(String, u32, W1SysfsOpener)>);

impl Registrar<W1SysfsOpener> for Table {
    type Error = Infallible;

    fn register(
        &mut self,
        name: &str,
        aliases: &[&str],
        number: u32,
        opener: W1SysfsOpener,
    ) -> Result<(), Infallible> {
        assert!(aliases.is_empty());
        self.0.push((name.to_string(), number, opener));
        Ok(())
    }
}

#[test]
fn discover_registers_numbered_masters() {
    let root = sysfs_tree();
    let mut table = Table::default();
    assert_eq!(builder(root.path()).discover(&mut table).unwrap(), 2);
    let names: Vec<_> = table.0.iter().map(|(n, b, _)| (n.as_str(), *b)).collect();
    assert_eq!(names, [("sysfs-1", 1), ("sysfs-2", 2)]);

    let (_, _, opener) = &table.0[0];
    assert_eq!(opener.bus(), 1);
    let mut bus = opener.open().unwrap();
    assert_eq!(bus.search(false).unwrap().len(), 2);
}

#[test]
fn discover_without_masters() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("w1_bus_master_stale")).unwrap();
    let mut table = Table::default();
    assert!(matches!(
        builder(root.path()).discover(&mut table),
        Err(W1SysfsError::NoBusFound)
    ));
    assert!(matches!(
        builder(&root.path().join("missing")).discover(&mut table),
        Err(W1SysfsError::NoBusFound)
    ));
    assert!(table.0.is_empty());
}
