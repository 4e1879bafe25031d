// src/system/windows_ffi.rs

//! Win32 implementation of [`SecurityApi`].
#![allow(unsafe_code)]

use super::windows::{Luid, SecurityApi};
use crate::constants::{
    ERROR_NOT_ALL_ASSIGNED, SE_PRIVILEGE_ENABLED, SE_SHUTDOWN_NAME, TOKEN_ADJUST_PRIVILEGES,
    TOKEN_QUERY,
};
use std::ptr;
use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, HANDLE, LUID};
use windows_sys::Win32::Security::{
    AdjustTokenPrivileges, LUID_AND_ATTRIBUTES, LookupPrivilegeValueW, TOKEN_PRIVILEGES,
};
use windows_sys::Win32::System::Shutdown::ExitWindowsEx;
use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

/// An open token handle for the current process.
#[derive(Debug)]
pub struct ProcessToken(HANDLE);

/// Calls straight into advapi32 / user32.
#[derive(Debug, Default)]
pub struct Win32Security;

fn last_error() -> u32 {
    // SAFETY: reads thread-local state only.
    unsafe { GetLastError() }
}

fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

impl SecurityApi for Win32Security {
    type Token = ProcessToken;

    fn open_process_token(&self) -> Result<ProcessToken, u32> {
        let mut handle: HANDLE = ptr::null_mut();
        // SAFETY: the pseudo-handle from GetCurrentProcess needs no closing and `handle` is a
        // valid out pointer for the duration of the call.
        let ok = unsafe {
            OpenProcessToken(
                GetCurrentProcess(),
                TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
                &mut handle,
            )
        };
        if ok == 0 {
            return Err(last_error());
        }
        Ok(ProcessToken(handle))
    }

    fn lookup_shutdown_privilege(&self) -> Result<Luid, u32> {
        let name = to_wide(SE_SHUTDOWN_NAME);
        let mut luid = LUID {
            LowPart: 0,
            HighPart: 0,
        };
        // SAFETY: `name` is NUL-terminated and outlives the call; a null system name means
        // the local system.
        let ok = unsafe { LookupPrivilegeValueW(ptr::null(), name.as_ptr(), &mut luid) };
        if ok == 0 {
            return Err(last_error());
        }
        Ok(Luid {
            low_part: luid.LowPart,
            high_part: luid.HighPart,
        })
    }

    fn enable_privilege(&self, token: &ProcessToken, privilege: Luid) -> Result<(), u32> {
        let new_state = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: LUID {
                    LowPart: privilege.low_part,
                    HighPart: privilege.high_part,
                },
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };
        // SAFETY: `token` is an open handle owned by the caller; the previous-state outputs
        // are not requested.
        let ok = unsafe {
            AdjustTokenPrivileges(
                token.0,
                0,
                &new_state,
                0,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(last_error());
        }
        // A successful return still leaves ERROR_NOT_ALL_ASSIGNED behind when the token does
        // not hold the privilege at all.
        match last_error() {
            ERROR_NOT_ALL_ASSIGNED => Err(ERROR_NOT_ALL_ASSIGNED),
            _ => Ok(()),
        }
    }

    fn exit_windows(&self, flags: u32, reason: u32) -> Result<(), u32> {
        // SAFETY: plain value arguments.
        let ok = unsafe { ExitWindowsEx(flags, reason) };
        if ok == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn release_token(&self, token: ProcessToken) {
        // SAFETY: the handle came from OpenProcessToken and is closed exactly once, here.
        let ok = unsafe { CloseHandle(token.0) };
        if ok == 0 {
            log::warn!("CloseHandle on the process token failed: {}", last_error());
        }
    }
}
