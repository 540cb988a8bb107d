use std::mem::ManuallyDrop;
use tern_std::rt;
use tern_std::{Arc, Option, String, Vec};

/// Builds a producer-side byte vector the way the runtime would before
/// handing it across the boundary.
fn byte_vec(bytes: &[u8]) -> Vec<u8> {
    let mut vec = Vec::new();
    for b in bytes {
        vec.push(*b);
    }
    vec
}

#[test]
fn string_hi_crosses_the_boundary() {
    let vec = byte_vec(&[104, 105]);
    assert_eq!(&*vec, b"hi");

    let mut string = ManuallyDrop::new(String::from("hi"));
    unsafe {
        assert_eq!(rt::tn_rt_str_len(&*string), 2);
        assert_eq!(*rt::tn_rt_str_at(&*string, 0), 104);
        assert_eq!(*rt::tn_rt_str_at(&*string, 1), 105);

        let data = rt::tn_rt_str_data(&*string);
        assert_eq!(std::slice::from_raw_parts(data, 2), &[104, 105]);

        rt::tn_rt_str_free(&mut *string as *mut String);
    }
}

#[test]
fn vec_accessors_match_inserted_elements() {
    let mut vec = Vec::new();
    for i in 0..16u64 {
        vec.push(i * i);
    }
    unsafe {
        assert_eq!(rt::tn_rt_vec_len_u64(&vec), 16);
        for i in 0..16usize {
            assert_eq!(*rt::tn_rt_vec_at_u64(&vec, i), (i * i) as u64);
        }
        let data = rt::tn_rt_vec_data_u64(&vec);
        assert_eq!(*data, 0);
        assert_eq!(*data.add(15), 225);
    }
    let mut vec = ManuallyDrop::new(vec);
    unsafe {
        rt::tn_rt_vec_free_u64(&mut *vec as *mut Vec<u64>);
    }
}

#[test]
fn option_boundary_presence_check() {
    let some = Option::Some(3.5f64);
    let none: Option<f64> = Option::None;
    unsafe {
        assert!(rt::tn_rt_option_has_value_f64(&some));
        assert!(!rt::tn_rt_option_has_value_f64(&none));
        assert_eq!(*rt::tn_rt_option_value_f64(&some), 3.5);
    }
}

#[test]
fn refcount_balances_across_threads() {
    let arc = Arc::new(99u64);

    let workers: std::vec::Vec<_> = (0..8)
        .map(|_| {
            let local = arc.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    unsafe {
                        let mut dup = ManuallyDrop::new(rt::tn_rt_arc_clone_u64(&local));
                        assert_eq!(*rt::tn_rt_arc_get_u64(&*dup), 99);
                        rt::tn_rt_arc_free_u64(&mut *dup as *mut Arc<u64>);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker should not panic");
    }

    // Every boundary clone was matched by a boundary free.
    assert_eq!(arc.ref_count(), 1);
    assert_eq!(*arc, 99);
}

#[test]
fn instantiations_do_not_alias() {
    // One binding per element type: the u8 and u32 projections observe
    // byte counts and element counts independently.
    let bytes = byte_vec(&[1, 2, 3, 4]);
    let mut words = Vec::new();
    words.push(0xAABBCCDDu32);
    unsafe {
        assert_eq!(rt::tn_rt_vec_len_u8(&bytes), 4);
        assert_eq!(rt::tn_rt_vec_len_u32(&words), 1);
        assert_eq!(*rt::tn_rt_vec_at_u32(&words, 0), 0xAABBCCDD);
    }
}
