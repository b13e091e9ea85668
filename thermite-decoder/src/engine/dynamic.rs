//! FFI shim engine: forwards the four engine calls to a native libthermite
//!
//! This module provides safe Rust bindings around a thermite shared
//! library loaded at runtime (`libthermite.so` / `libthermite.dylib` /
//! `thermite.dll`). Nothing is linked at build time, so the pure
//! [`FileEngine`](super::FileEngine) stays the default and this shim is
//! opt-in via the `dynamic-engine` feature.

use libloading::Library;
use std::ffi::CString;
use std::os::raw::c_char;
use std::path::Path;

use super::codes;
use super::format::{RawHeader, RawSample};
use super::LogEngine;

type HeaderCountFn = unsafe extern "C" fn(*const c_char) -> i64;
type HeadersFn = unsafe extern "C" fn(*const c_char, *mut RawHeader, i64) -> i64;
type DataCountFn = unsafe extern "C" fn(*const c_char, *const c_char) -> i64;
type DataFn =
    unsafe extern "C" fn(*const c_char, *const c_char, *mut RawSample, i64) -> i64;

/// Engine backed by a native thermite shared library
pub struct DynamicEngine {
    library: Library,
}

impl DynamicEngine {
    /// Load a native thermite engine from the given shared library path
    pub fn load(library_path: &Path) -> Result<Self, libloading::Error> {
        log::info!("Loading native thermite engine from {:?}", library_path);
        let library = unsafe { Library::new(library_path) }?;
        Ok(Self { library })
    }

    fn c_string(text: &str) -> Option<CString> {
        CString::new(text).ok()
    }

    fn c_path(path: &Path) -> Option<CString> {
        Self::c_string(&path.to_string_lossy())
    }
}

impl LogEngine for DynamicEngine {
    fn header_count(&self, path: &Path) -> i64 {
        let Some(cpath) = Self::c_path(path) else {
            return codes::OPEN_FAILED;
        };
        unsafe {
            match self.library.get::<HeaderCountFn>(b"thermite_header_count\0") {
                Ok(func) => func(cpath.as_ptr()),
                Err(e) => {
                    log::warn!("thermite_header_count not found in engine: {}", e);
                    codes::READ_FAILED
                }
            }
        }
    }

    fn headers(&self, path: &Path, out: &mut [RawHeader]) -> i64 {
        let Some(cpath) = Self::c_path(path) else {
            return codes::OPEN_FAILED;
        };
        unsafe {
            match self.library.get::<HeadersFn>(b"thermite_headers\0") {
                Ok(func) => func(cpath.as_ptr(), out.as_mut_ptr(), out.len() as i64),
                Err(e) => {
                    log::warn!("thermite_headers not found in engine: {}", e);
                    codes::READ_FAILED
                }
            }
        }
    }

    fn data_count(&self, path: &Path, name: &str) -> i64 {
        let (Some(cpath), Some(cname)) = (Self::c_path(path), Self::c_string(name))
        else {
            return codes::OPEN_FAILED;
        };
        unsafe {
            match self.library.get::<DataCountFn>(b"thermite_data_count\0") {
                Ok(func) => func(cpath.as_ptr(), cname.as_ptr()),
                Err(e) => {
                    log::warn!("thermite_data_count not found in engine: {}", e);
                    codes::READ_FAILED
                }
            }
        }
    }

    fn data(&self, path: &Path, name: &str, out: &mut [RawSample]) -> i64 {
        let (Some(cpath), Some(cname)) = (Self::c_path(path), Self::c_string(name))
        else {
            return codes::OPEN_FAILED;
        };
        unsafe {
            match self.library.get::<DataFn>(b"thermite_data\0") {
                Ok(func) => func(
                    cpath.as_ptr(),
                    cname.as_ptr(),
                    out.as_mut_ptr(),
                    out.len() as i64,
                ),
                Err(e) => {
                    log::warn!("thermite_data not found in engine: {}", e);
                    codes::READ_FAILED
                }
            }
        }
    }
}
