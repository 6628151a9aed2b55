use crate::{HostIo, SysfsIo, W1SysfsError, W1SysfsResult, codec};
use log::{debug, trace};
use onewire_bus::{
    Address, Pullup, Registrar,
    consts::{ONEWIRE_FRAME_HEADER_LEN, ONEWIRE_MATCH_ROM_CMD},
};
use std::{
    fmt::Display,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

/// Directory under which the kernel exposes 1-Wire bus masters.
pub const W1_SYSFS_ROOT: &str = "/sys/devices";

const MASTER_PREFIX: &str = "w1_bus_master";
const PULLUP_FILE: &str = "w1_master_pullup";
const ENDPOINT_FILE: &str = "rw";

/// Whether the platform provides the w1 sysfs interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// The w1 sysfs interface is available.
    Supported,
    /// Every operation fails with [W1SysfsError::UnsupportedPlatform] without
    /// touching the filesystem.
    Unsupported,
}

impl Platform {
    /// The platform this binary was built for: only Linux has w1 sysfs.
    pub const fn host() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Supported
        } else {
            Platform::Unsupported
        }
    }

    fn ensure_supported(self) -> W1SysfsResult<()> {
        match self {
            Platform::Supported => Ok(()),
            Platform::Unsupported => Err(W1SysfsError::UnsupportedPlatform),
        }
    }
}

/// Builder for opening [`W1Sysfs`] buses and discovering them.
#[derive(Debug, Clone)]
pub struct W1SysfsBuilder<F = HostIo> {
    pub(crate) root: PathBuf,
    pub(crate) platform: Platform,
    pub(crate) io: F,
}

impl Default for W1SysfsBuilder {
    fn default() -> Self {
        W1SysfsBuilder {
            root: PathBuf::from(W1_SYSFS_ROOT),
            platform: Platform::host(),
            io: HostIo,
        }
    }
}

impl<F> W1SysfsBuilder<F> {
    /// Sets the directory holding the `w1_bus_master<N>` entries.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Overrides the detected platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replaces the filesystem access.
    pub fn with_io<G: SysfsIo>(self, io: G) -> W1SysfsBuilder<G> {
        W1SysfsBuilder {
            root: self.root,
            platform: self.platform,
            io,
        }
    }
}

impl<F: SysfsIo> W1SysfsBuilder<F> {
    /// Opens bus `bus`.
    ///
    /// Nothing is read at this point; a missing bus shows up on first use.
    pub fn open(self, bus: u32) -> W1SysfsResult<W1Sysfs<F>> {
        self.platform.ensure_supported()?;
        let master = self.root.join(format!("{MASTER_PREFIX}{bus}"));
        debug!("opened onewire bus {bus} at {}", master.display());
        Ok(W1Sysfs {
            bus,
            master,
            io: self.io,
        })
    }

    /// Scans the root for bus masters and registers each one as `sysfs-<N>`.
    ///
    /// Entries whose suffix is not a number are skipped. Returns how many buses
    /// were registered.
    pub fn discover<R>(&self, registrar: &mut R) -> W1SysfsResult<usize>
    where
        F: Clone,
        R: Registrar<W1SysfsOpener<F>>,
        R::Error: Display,
    {
        self.platform.ensure_supported()?;
        let names = match self.io.list_dir(&self.root) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(W1SysfsError::io(&self.root, e)),
        };
        let mut buses: Vec<u32> = names
            .iter()
            .filter_map(|name| name.strip_prefix(MASTER_PREFIX))
            .filter_map(|suffix| match suffix.parse() {
                Ok(bus) => Some(bus),
                Err(_) => {
                    trace!("skipping {MASTER_PREFIX}{suffix}");
                    None
                }
            })
            .collect();
        if buses.is_empty() {
            return Err(W1SysfsError::NoBusFound);
        }
        buses.sort_unstable();
        buses.dedup();
        for &bus in &buses {
            let name = format!("sysfs-{bus}");
            let opener = W1SysfsOpener {
                builder: self.clone(),
                bus,
            };
            registrar
                .register(&name, &[], bus, opener)
                .map_err(|e| W1SysfsError::Registration(e.to_string()))?;
            debug!("registered onewire bus {name}");
        }
        Ok(buses.len())
    }
}

/// Opens one discovered bus on demand.
#[derive(Debug, Clone)]
pub struct W1SysfsOpener<F = HostIo> {
    builder: W1SysfsBuilder<F>,
    bus: u32,
}

impl<F: SysfsIo + Clone> W1SysfsOpener<F> {
    /// Bus number this opener opens.
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// Opens the bus.
    pub fn open(&self) -> W1SysfsResult<W1Sysfs<F>> {
        self.builder.clone().open(self.bus)
    }
}

/// A 1-Wire bus master exposed by the kernel under `w1_bus_master<N>`.
///
/// No file is held open between calls. Transfers on one bus must be serialized by the
/// caller, which `&mut self` enforces for a single handle.
#[derive(Debug)]
pub struct W1Sysfs<F = HostIo> {
    bus: u32,
    master: PathBuf,
    io: F,
}

impl<F: SysfsIo> W1Sysfs<F> {
    /// Bus number.
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// Performs one transfer to the device selected by the Match ROM frame `write`.
    ///
    /// Sets the pull-up, writes the payload after the 9-byte header to the device's
    /// `rw` file and reads the response into `read`. A failure after the pull-up was
    /// set leaves it set.
    pub fn tx(&mut self, write: &[u8], read: &mut [u8], pullup: Pullup) -> W1SysfsResult<()> {
        if write.len() < ONEWIRE_FRAME_HEADER_LEN || write[0] != ONEWIRE_MATCH_ROM_CMD {
            return Err(W1SysfsError::MalformedFrame);
        }
        self.set_pullup(pullup)?;

        let mut rom = [0; Address::BYTES];
        rom.copy_from_slice(&write[1..ONEWIRE_FRAME_HEADER_LEN]);
        let endpoint = self
            .master
            .join(codec::encode_dir_name(Address::from_le_bytes(rom)))
            .join(ENDPOINT_FILE);

        self.write_once(&endpoint, &write[ONEWIRE_FRAME_HEADER_LEN..])?;
        self.read_once(&endpoint, read)
    }

    /// Lists the devices the kernel has found on this bus.
    ///
    /// `alarm_only` is not supported by sysfs and is ignored: all devices are listed.
    pub fn search(&mut self, alarm_only: bool) -> W1SysfsResult<Vec<Address>> {
        if alarm_only {
            debug!("alarm search is not available through sysfs, listing all devices");
        }
        let mut names = match self.io.list_dir(&self.master) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(W1SysfsError::io(&self.master, e)),
        };
        names.retain(|name| name.contains('-'));
        if names.is_empty() {
            return Err(W1SysfsError::NoDeviceFound);
        }
        names.sort_unstable();
        let devices = names
            .iter()
            .map(|name| codec::decode_dir_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("found {} devices on bus {}", devices.len(), self.bus);
        Ok(devices)
    }

    /// Closes the bus. Nothing is held, so this always succeeds.
    pub fn close(&mut self) -> W1SysfsResult<()> {
        Ok(())
    }

    fn set_pullup(&self, pullup: Pullup) -> W1SysfsResult<()> {
        let value = match pullup {
            Pullup::Strong => b'0',
            Pullup::Normal => b'1',
        };
        self.write_once(&self.master.join(PULLUP_FILE), &[value])
    }

    /// One `write` call; sysfs attributes take a store per call.
    fn write_once(&self, path: &Path, data: &[u8]) -> W1SysfsResult<()> {
        let mut file = self
            .io
            .open_write(path)
            .map_err(|e| W1SysfsError::io(path, e))?;
        let written = file.write(data).map_err(|e| W1SysfsError::io(path, e))?;
        trace!("{} <- {data:02x?}", path.display());
        if written < data.len() {
            return Err(W1SysfsError::ShortWrite {
                path: path.to_path_buf(),
                written,
                expected: data.len(),
            });
        }
        Ok(())
    }

    fn read_once(&self, path: &Path, buf: &mut [u8]) -> W1SysfsResult<()> {
        let mut file = self
            .io
            .open_read(path)
            .map_err(|e| W1SysfsError::io(path, e))?;
        let count = file.read(buf).map_err(|e| W1SysfsError::io(path, e))?;
        trace!("{} -> {:02x?}", path.display(), &buf[..count]);
        Ok(())
    }
}
