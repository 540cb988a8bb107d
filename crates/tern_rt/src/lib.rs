//! tern_rt — Tern runtime ABI.
//!
//! The boundary function table: the only surface a native caller may use
//! to inspect or release containers produced by the Tern runtime. Every
//! export is a free `extern "C"` function over a container pointer;
//! nothing here exposes the producer's allocator or destructor machinery
//! directly.
//!
//! Rust refuses `#[no_mangle]` on generic functions, so each generic
//! container is projected once per element type: the macros below stamp
//! out one concrete symbol per (type, operation) pair, and a binding for
//! one instantiation must never be applied to another (no punning
//! between, say, `Vec<u8>` and `Vec<u32>` handles). Adding an
//! instantiation is one macro invocation.

#![allow(clippy::missing_safety_doc)]

use std::mem;
use std::ptr;

use tern_arc::Arc;
use tern_opt::Option;
use tern_own::{OwnedSlice, OwnedStr};
use tern_vec::{String, Vec};

// ---------------------------------------------------------------------------
// Layout assertions
//
// The native side compiles against these shapes; a drift here is an ABI
// break, so it has to fail the build, not a test run.
// ---------------------------------------------------------------------------

const _: () = assert!(mem::size_of::<Arc<u64>>() == mem::size_of::<usize>());
const _: () = assert!(mem::size_of::<Vec<u8>>() == 3 * mem::size_of::<usize>());
const _: () = assert!(mem::size_of::<Vec<u64>>() == 3 * mem::size_of::<usize>());
const _: () = assert!(mem::size_of::<String>() == mem::size_of::<Vec<u8>>());
const _: () = assert!(mem::size_of::<OwnedSlice<u8>>() == 2 * mem::size_of::<usize>());
const _: () = assert!(mem::size_of::<OwnedStr>() == mem::size_of::<OwnedSlice<u8>>());
const _: () = assert!(mem::size_of::<Option<u8>>() == 2);
const _: () = assert!(mem::size_of::<Option<u64>>() == 2 * mem::size_of::<u64>());
const _: () = assert!(mem::align_of::<Option<u64>>() == mem::align_of::<u64>());

// ---------------------------------------------------------------------------
// Contract violations
// ---------------------------------------------------------------------------

/// Detected contract violations must not unwind across the boundary:
/// report one line to stderr and abort the process.
fn rt_abort(msg: &str) -> ! {
    eprintln!("tern runtime abort: {}", msg);
    std::process::abort()
}

// ---------------------------------------------------------------------------
// Arc<T>
// ---------------------------------------------------------------------------

/// Projects the shared-box operations for one element type: borrow the
/// held value, take an additional ownership handle, release one handle.
macro_rules! arc_abi {
    ($get:ident, $clone:ident, $free:ident, $t:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn $get(arc: *const Arc<$t>) -> *const $t {
            (&*arc).get()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $clone(arc: *const Arc<$t>) -> Arc<$t> {
            (&*arc).clone()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $free(arc: *mut Arc<$t>) {
            ptr::drop_in_place(arc);
        }
    };
}

arc_abi!(tn_rt_arc_get_u64, tn_rt_arc_clone_u64, tn_rt_arc_free_u64, u64);
arc_abi!(tn_rt_arc_get_f64, tn_rt_arc_clone_f64, tn_rt_arc_free_f64, f64);
arc_abi!(tn_rt_arc_get_str, tn_rt_arc_clone_str, tn_rt_arc_free_str, String);

// ---------------------------------------------------------------------------
// Option<T>
// ---------------------------------------------------------------------------

/// Projects the optional-value operations for one element type. Reading
/// the value of a `None` is a contract violation and aborts.
macro_rules! option_abi {
    ($has_value:ident, $value:ident, $t:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn $has_value(option: *const Option<$t>) -> bool {
            (&*option).is_some()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $value(option: *const Option<$t>) -> *const $t {
            match &*option {
                Option::Some(value) => value,
                Option::None => rt_abort(concat!(stringify!($value), ": tag is None")),
            }
        }
    };
}

option_abi!(tn_rt_option_has_value_u8, tn_rt_option_value_u8, u8);
option_abi!(tn_rt_option_has_value_u32, tn_rt_option_value_u32, u32);
option_abi!(tn_rt_option_has_value_u64, tn_rt_option_value_u64, u64);
option_abi!(tn_rt_option_has_value_i64, tn_rt_option_value_i64, i64);
option_abi!(tn_rt_option_has_value_f64, tn_rt_option_value_f64, f64);

// ---------------------------------------------------------------------------
// Vec<T>
// ---------------------------------------------------------------------------

/// Projects the growable-array snapshot accessors and the owning free
/// for one element type. `at` trusts the caller's bounds check; the free
/// destroys the `len` live elements before releasing the `cap`-sized
/// buffer, and the value must not be used again afterwards.
macro_rules! vec_abi {
    ($len:ident, $at:ident, $data:ident, $free:ident, $t:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn $len(vec: *const Vec<$t>) -> usize {
            (&*vec).len()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $at(vec: *const Vec<$t>, i: usize) -> *const $t {
            debug_assert!(i < (&*vec).len());
            (&*vec).as_ptr().add(i)
        }

        #[no_mangle]
        pub unsafe extern "C" fn $data(vec: *const Vec<$t>) -> *const $t {
            (&*vec).as_ptr()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $free(vec: *mut Vec<$t>) {
            ptr::drop_in_place(vec);
        }
    };
}

vec_abi!(tn_rt_vec_len_u8, tn_rt_vec_at_u8, tn_rt_vec_data_u8, tn_rt_vec_free_u8, u8);
vec_abi!(tn_rt_vec_len_u32, tn_rt_vec_at_u32, tn_rt_vec_data_u32, tn_rt_vec_free_u32, u32);
vec_abi!(tn_rt_vec_len_u64, tn_rt_vec_at_u64, tn_rt_vec_data_u64, tn_rt_vec_free_u64, u64);
vec_abi!(tn_rt_vec_len_i64, tn_rt_vec_at_i64, tn_rt_vec_data_i64, tn_rt_vec_free_i64, i64);
vec_abi!(tn_rt_vec_len_f64, tn_rt_vec_at_f64, tn_rt_vec_data_f64, tn_rt_vec_free_f64, f64);

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

/// Byte count of the string.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_str_len(string: *const String) -> usize {
    (&*string).len()
}

/// Pointer to byte `i`; the caller guarantees `i < len`.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_str_at(string: *const String, i: usize) -> *const u8 {
    debug_assert!(i < (&*string).len());
    (&*string).as_ptr().add(i)
}

/// Pointer to the first byte, valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_str_data(string: *const String) -> *const u8 {
    (&*string).as_ptr()
}

/// Destroys the byte buffer. The value must not be used again.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_str_free(string: *mut String) {
    ptr::drop_in_place(string);
}

// ---------------------------------------------------------------------------
// OwnedSlice<T> / OwnedStr
// ---------------------------------------------------------------------------

/// Projects the fixed-length buffer view and its explicit release entry
/// point for one element type. The release is idempotent: the first call
/// resets the value to the empty-sentinel state, later calls find
/// nothing to free.
macro_rules! owned_abi {
    ($len:ident, $data:ident, $free:ident, $t:ty) => {
        #[no_mangle]
        pub unsafe extern "C" fn $len(slice: *const OwnedSlice<$t>) -> usize {
            (&*slice).len()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $data(slice: *const OwnedSlice<$t>) -> *const $t {
            (&*slice).as_ptr()
        }

        #[no_mangle]
        pub unsafe extern "C" fn $free(slice: *mut OwnedSlice<$t>) {
            ptr::drop_in_place(slice);
        }
    };
}

owned_abi!(tn_rt_owned_len_u8, tn_rt_owned_data_u8, tn_rt_owned_free_u8, u8);
owned_abi!(tn_rt_owned_len_u32, tn_rt_owned_data_u32, tn_rt_owned_free_u32, u32);
owned_abi!(tn_rt_owned_len_u64, tn_rt_owned_data_u64, tn_rt_owned_free_u64, u64);

/// Byte count of the owned string.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_owned_str_len(string: *const OwnedStr) -> usize {
    (&*string).len()
}

/// Pointer to the first byte, valid for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_owned_str_data(string: *const OwnedStr) -> *const u8 {
    (&*string).as_ptr()
}

/// Explicit release entry point; idempotent like the slice release.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_owned_str_free(string: *mut OwnedStr) {
    ptr::drop_in_place(string);
}

/// The producer's hash for string keys, re-exported so the native side
/// can probe producer-built tables.
#[no_mangle]
pub unsafe extern "C" fn tn_rt_hash_owned_str(string: *const OwnedStr) -> u64 {
    tern_map::hash_owned_str(&*string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
