//! tern_arc — atomically reference-counted shared box.
//!
//! One heap allocation holds the count and the value inline
//! (`ArcInner`); an `Arc` handle is a single pointer to it. The count
//! starts at 1, clone increments, drop decrements, and the handle that
//! observes the 1→0 transition destroys the value and releases the
//! allocation. Native callers manipulate handles only through the
//! `tern_rt` boundary functions.

use std::marker::PhantomData;
use std::mem;
use std::ops::Deref;
use std::sync::atomic::{self, AtomicUsize, Ordering};

use tern_ptr::NonNull;

/// Heap allocation backing one shared value: the count, then the value.
#[repr(C)]
pub struct ArcInner<T> {
    rc: AtomicUsize,
    data: T,
}

// The count must sit at offset 0 so every instantiation shares one
// projection on the native side.
const _: () = assert!(mem::offset_of!(ArcInner<u64>, rc) == 0);
const _: () = assert!(mem::offset_of!(ArcInner<u64>, data) == mem::size_of::<usize>());

/// Shared ownership of one `ArcInner<T>` allocation.
#[repr(C)]
pub struct Arc<T> {
    ptr: NonNull<ArcInner<T>>,
    phantom: PhantomData<ArcInner<T>>,
}

unsafe impl<T: Sync + Send> Send for Arc<T> {}
unsafe impl<T: Sync + Send> Sync for Arc<T> {}

impl<T> Arc<T> {
    pub fn new(data: T) -> Arc<T> {
        // The count starts at 1: the reference held by the value we
        // are about to return.
        let boxed = Box::new(ArcInner {
            rc: AtomicUsize::new(1),
            data,
        });
        Arc {
            // Box::into_raw never returns null.
            ptr: unsafe { NonNull::new_unchecked(Box::into_raw(boxed)) },
            phantom: PhantomData,
        }
    }

    /// Borrows the held value without touching the count.
    #[inline]
    pub fn get(&self) -> &T {
        let inner = unsafe { self.ptr.as_ref() };
        &inner.data
    }

    /// Current count, loaded without synchronization. Only meaningful
    /// when the caller can rule out concurrent clone/free, e.g. in tests.
    #[inline]
    pub fn ref_count(&self) -> usize {
        let inner = unsafe { self.ptr.as_ref() };
        inner.rc.load(Ordering::Relaxed)
    }
}

impl<T> Deref for Arc<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> Clone for Arc<T> {
    fn clone(&self) -> Arc<T> {
        let inner = unsafe { self.ptr.as_ref() };
        // Relaxed suffices: no data is read or written on this path,
        // only the count moves.
        let old_rc = inner.rc.fetch_add(1, Ordering::Relaxed);

        if old_rc >= isize::MAX as usize {
            std::process::abort();
        }

        Self {
            ptr: self.ptr,
            phantom: PhantomData,
        }
    }
}

impl<T> Drop for Arc<T> {
    fn drop(&mut self) {
        let inner = unsafe { self.ptr.as_ref() };
        if inner.rc.fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        // The fence pairs with the Release decrements above: every use
        // of the data happens-before the deletion below.
        atomic::fence(Ordering::Acquire);
        // We hold the last reference, so the pointer is still valid and
        // nobody else can reach the allocation.
        unsafe {
            drop(Box::from_raw(self.ptr.as_ptr()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn new_starts_at_one() {
        let arc = Arc::new(42u64);
        assert_eq!(*arc, 42);
        assert_eq!(arc.ref_count(), 1);
    }

    #[test]
    fn clone_and_drop_move_the_count() {
        let a = Arc::new(String::from("shared"));
        let b = a.clone();
        let c = b.clone();
        assert_eq!(a.ref_count(), 3);
        assert_eq!(c.get(), "shared");
        drop(b);
        drop(c);
        assert_eq!(a.ref_count(), 1);
    }

    #[test]
    fn last_drop_destroys_exactly_once() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);

        struct Guard;
        impl Drop for Guard {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let a = Arc::new(Guard);
        let b = a.clone();
        drop(a);
        assert_eq!(DROPS.load(Ordering::SeqCst), 0);
        drop(b);
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_clone_free_balances() {
        let arc = Arc::new(7u64);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let local = arc.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let extra = local.clone();
                        assert_eq!(*extra, 7);
                        drop(extra);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker should not panic");
        }
        assert_eq!(arc.ref_count(), 1);
    }

    #[test]
    fn handle_is_one_pointer_wide() {
        assert_eq!(mem::size_of::<Arc<u64>>(), mem::size_of::<usize>());
    }

    #[test]
    fn send_sync_bounds() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arc<u64>>();
    }
}
