//! Windows-specific adapter enumeration, removal and renaming.
//!
//! Adapters are found by walking the network device class with SetupAPI, so
//! disabled adapters are listed along with enabled ones. The alias comes from
//! the interface table, or from the connection's registry key when the
//! adapter has no interface (as is the case while it is disabled).

use std::os::windows::process::CommandExt;
use std::process::Command;

use crate::adapter::{
    AdapterClass, AdapterEnumerator, AdapterRemover, AdapterRenamer, EnumerateError, RemoveError,
    RenameError, TapAdapter,
};
use windows::Win32::Devices::DeviceAndDriverInstallation::{
    DICS_FLAG_GLOBAL, DIGCF_PRESENT, DIREG_DRV, GUID_DEVCLASS_NET, HDEVINFO,
    SETUP_DI_REGISTRY_PROPERTY, SP_DEVINFO_DATA, SPDRP_DEVICEDESC, SPDRP_FRIENDLYNAME,
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsW,
    SetupDiGetDeviceRegistryPropertyW, SetupDiOpenDevRegKey, SetupDiRemoveDevice,
};
use windows::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, ERROR_NO_MORE_ITEMS};
use windows::Win32::NetworkManagement::IpHelper::{
    ConvertInterfaceGuidToLuid, ConvertInterfaceLuidToAlias,
};
use windows::Win32::NetworkManagement::Ndis::NET_LUID_LH;
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_READ, RRF_RT_REG_SZ, RegCloseKey, RegGetValueW,
};
use windows::core::{GUID, PCWSTR, w};

/// Registry key holding per-connection settings of the network class.
const NETWORK_CONNECTIONS_KEY: &str =
    r"SYSTEM\CurrentControlSet\Control\Network\{4D36E972-E325-11CE-BFC1-08002BE10318}";

/// Capacity in UTF-16 units for aliases and registry strings (`IF_MAX_STRING_SIZE + 1`).
const STRING_CAPACITY: usize = 257;

/// Initial buffer size in bytes for device properties.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_PROPERTY_SIZE: usize = 256;

/// How often a device property read is retried with the size the API asked for.
const PROPERTY_ATTEMPTS: usize = 3;

/// Windows implementation of the adapter collaborators.
///
/// # Example
///
/// ```no_run
/// use driverlogic::adapter::{AdapterClass, AdapterEnumerator, platform::WindowsTapAdapters};
///
/// let class = AdapterClass::new("^TAP-Windows Adapter V9").unwrap();
/// let adapters = WindowsTapAdapters::new().enumerate(&class).expect("enumeration failed");
///
/// for adapter in adapters {
///     println!("{adapter}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsTapAdapters {
    _private: (),
}

impl WindowsTapAdapters {
    /// Creates the Windows collaborator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AdapterEnumerator for WindowsTapAdapters {
    fn enumerate(&self, class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
        enumerate_adapters(class)
    }
}

impl AdapterRemover for WindowsTapAdapters {
    fn remove(&self, identifier: &str) -> Result<(), RemoveError> {
        remove_device(identifier)
    }
}

impl AdapterRenamer for WindowsTapAdapters {
    /// Renames through `netsh`. Both names are quoted verbatim, so neither may
    /// contain `"`; connection names never do, and configured aliases are
    /// validated before they get here.
    fn rename(&self, adapter: &TapAdapter, alias: &str) -> Result<(), RenameError> {
        tracing::debug!("Renaming \"{}\" to \"{alias}\"", adapter.alias);

        let status = Command::new("netsh")
            .args(["interface", "set", "interface"])
            .raw_arg(format!("name=\"{}\"", adapter.alias))
            .raw_arg(format!("newname=\"{alias}\""))
            .status()
            .map_err(RenameError::Spawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(RenameError::Failed { status })
        }
    }
}

/// Lists every network device whose description belongs to `class`.
fn enumerate_adapters(class: &AdapterClass) -> Result<Vec<TapAdapter>, EnumerateError> {
    let devices = DeviceInfoSet::network_class()?;
    let mut adapters = Vec::new();

    for index in 0.. {
        let Some(device) = devices.device(index)? else {
            break;
        };

        let Some(device_name) = devices.description(&device) else {
            continue;
        };
        if !class.matches(&device_name) {
            continue;
        }

        let Some(identifier) = devices.instance_id(&device) else {
            tracing::debug!("Skipping \"{device_name}\": no NetCfgInstanceId");
            continue;
        };

        let alias = adapter_alias(&identifier).unwrap_or_default();
        adapters.push(TapAdapter::new(identifier, device_name, alias));
    }

    tracing::debug!("Enumerated {} adapter(s) of class {}", adapters.len(), class.as_str());
    Ok(adapters)
}

/// Removes the network device whose `NetCfgInstanceId` equals `identifier`.
fn remove_device(identifier: &str) -> Result<(), RemoveError> {
    let devices = DeviceInfoSet::network_class()?;

    for index in 0.. {
        let Some(mut device) = devices.device(index)? else {
            break;
        };

        let Some(instance_id) = devices.instance_id(&device) else {
            continue;
        };

        if instance_id.eq_ignore_ascii_case(identifier) {
            tracing::debug!("Removing device {instance_id}");
            // SAFETY: `device` was filled in by SetupDiEnumDeviceInfo on this set.
            unsafe { SetupDiRemoveDevice(devices.0, &raw mut device) }?;
            return Ok(());
        }
    }

    Err(RemoveError::NotFound {
        identifier: identifier.to_string(),
    })
}

/// Owned SetupAPI device information set for the network class.
struct DeviceInfoSet(HDEVINFO);

impl DeviceInfoSet {
    /// Opens every present network device, enabled or not.
    fn network_class() -> windows::core::Result<Self> {
        let class_guid = GUID_DEVCLASS_NET;

        // SAFETY: The GUID outlives the call; no enumerator filter or window is passed.
        let handle = unsafe {
            SetupDiGetClassDevsW(Some(&raw const class_guid), PCWSTR::null(), None, DIGCF_PRESENT)
        }?;

        Ok(Self(handle))
    }

    /// Returns the device at `index`, or `None` past the last one.
    fn device(&self, index: u32) -> windows::core::Result<Option<SP_DEVINFO_DATA>> {
        let mut device = SP_DEVINFO_DATA {
            cbSize: u32::try_from(std::mem::size_of::<SP_DEVINFO_DATA>()).unwrap_or(u32::MAX),
            ..Default::default()
        };

        // SAFETY: `device` is a correctly sized SP_DEVINFO_DATA.
        match unsafe { SetupDiEnumDeviceInfo(self.0, index, &raw mut device) } {
            Ok(()) => Ok(Some(device)),
            Err(e) if e.code() == ERROR_NO_MORE_ITEMS.to_hresult() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The description the OS shows for the device, numbered when several
    /// devices share a driver (`TAP-Windows Adapter V9 #2`).
    fn description(&self, device: &SP_DEVINFO_DATA) -> Option<String> {
        self.string_property(device, SPDRP_FRIENDLYNAME)
            .or_else(|| self.string_property(device, SPDRP_DEVICEDESC))
    }

    fn string_property(
        &self,
        device: &SP_DEVINFO_DATA,
        property: SETUP_DI_REGISTRY_PROPERTY,
    ) -> Option<String> {
        let mut buffer = vec![0u8; INITIAL_PROPERTY_SIZE];

        for _ in 0..PROPERTY_ATTEMPTS {
            let mut required = 0u32;

            // SAFETY: `device` belongs to this set; the buffer slice carries its own length.
            let result = unsafe {
                SetupDiGetDeviceRegistryPropertyW(
                    self.0,
                    device,
                    property,
                    None,
                    Some(buffer.as_mut_slice()),
                    Some(&raw mut required),
                )
            };

            match result {
                Ok(()) => {
                    let len = (required as usize).min(buffer.len());
                    return Some(decode_utf16_bytes(&buffer[..len]));
                }
                Err(e) if e.code() == ERROR_INSUFFICIENT_BUFFER.to_hresult() => {
                    buffer.resize(required as usize, 0);
                }
                Err(_) => return None,
            }
        }

        tracing::warn!("Device property kept growing; giving up after {PROPERTY_ATTEMPTS} attempts");
        None
    }

    /// Reads the `NetCfgInstanceId` value from the device's driver key.
    ///
    /// Returns `None` for devices without a driver key or the value.
    fn instance_id(&self, device: &SP_DEVINFO_DATA) -> Option<String> {
        // SAFETY: `device` belongs to this set.
        let key = unsafe {
            SetupDiOpenDevRegKey(self.0, device, DICS_FLAG_GLOBAL.0, 0, DIREG_DRV, KEY_READ.0)
        }
        .ok()
        .map(RegistryKey)?;

        registry_string(key.0, PCWSTR::null(), w!("NetCfgInstanceId"))
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        // SAFETY: The handle came from SetupDiGetClassDevsW and is released once.
        if let Err(e) = unsafe { SetupDiDestroyDeviceInfoList(self.0) } {
            tracing::warn!("Failed to release device information set: {e}");
        }
    }
}

/// Owned registry key handle.
struct RegistryKey(HKEY);

impl Drop for RegistryKey {
    fn drop(&mut self) {
        // SAFETY: The key was opened by SetupDiOpenDevRegKey and is closed once.
        if let Err(e) = unsafe { RegCloseKey(self.0) }.ok() {
            tracing::warn!("Failed to close registry key: {e}");
        }
    }
}

/// Reads a `REG_SZ` value below `key`.
fn registry_string(key: HKEY, subkey: PCWSTR, value: PCWSTR) -> Option<String> {
    let mut data = [0u16; STRING_CAPACITY];
    let mut data_len = u32::try_from(std::mem::size_of_val(&data)).unwrap_or(u32::MAX);

    // SAFETY: `data` and `data_len` describe a writable buffer of matching size.
    unsafe {
        RegGetValueW(
            key,
            subkey,
            value,
            RRF_RT_REG_SZ,
            None,
            Some(data.as_mut_ptr().cast()),
            Some(&raw mut data_len),
        )
    }
    .ok()
    .ok()?;

    Some(decode_utf16(&data))
}

/// Looks up the alias of the adapter with this instance id.
fn adapter_alias(identifier: &str) -> Option<String> {
    interface_alias(identifier).or_else(|| connection_name(identifier))
}

/// Alias from the interface table. Only enabled adapters have an interface.
fn interface_alias(identifier: &str) -> Option<String> {
    let guid = parse_guid(identifier)?;
    let mut luid = NET_LUID_LH::default();

    // SAFETY: Both pointers reference live locals.
    unsafe { ConvertInterfaceGuidToLuid(&raw const guid, &raw mut luid) }
        .ok()
        .ok()?;

    let mut alias = [0u16; STRING_CAPACITY];
    // SAFETY: `luid` was filled in above; the slice carries its own length.
    unsafe { ConvertInterfaceLuidToAlias(&raw const luid, &mut alias) }
        .ok()
        .ok()?;

    Some(decode_utf16(&alias))
}

/// Alias stored with the connection, present for disabled adapters too.
fn connection_name(identifier: &str) -> Option<String> {
    let subkey: Vec<u16> = format!(r"{NETWORK_CONNECTIONS_KEY}\{identifier}\Connection")
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    registry_string(HKEY_LOCAL_MACHINE, PCWSTR(subkey.as_ptr()), w!("Name"))
}

/// Parses a braced or bare GUID string.
fn parse_guid(identifier: &str) -> Option<GUID> {
    let hex: String = identifier
        .trim_start_matches('{')
        .trim_end_matches('}')
        .chars()
        .filter(|c| *c != '-')
        .collect();

    if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    u128::from_str_radix(&hex, 16).ok().map(GUID::from_u128)
}

/// Decodes a NUL-terminated UTF-16 buffer.
fn decode_utf16(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Decodes a NUL-terminated little-endian UTF-16 byte buffer.
fn decode_utf16_bytes(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    decode_utf16(&units)
}
