use analytics_ffi::*;
use approx::assert_relative_eq;
use std::os::raw::c_char;
use std::ptr;

fn line(rows: std::ops::Range<usize>) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = rows.map(|r| r as f64).collect();
    let y = x.iter().map(|v| 2.0 * v + 1.0).collect();
    (x, y)
}

fn options(algorithm: i32, method: i32, policy: i32) -> AnalyticsTrainingOptions {
    AnalyticsTrainingOptions {
        algorithm,
        method,
        intercept: 1,
        ridge: ptr::null(),
        n_ridge: 0,
        error_policy: policy,
    }
}

fn read_beta(len: i64, read: impl Fn(*mut f64, u64) -> i64) -> Vec<f64> {
    let mut out = vec![0.0; len as usize];
    assert_eq!(read(out.as_mut_ptr(), out.len() as u64), len);
    out
}

#[test]
fn test_batch_line() {
    unsafe {
        let opts = options(ANALYTICS_LINEAR, ANALYTICS_NORMAL_EQUATIONS, ANALYTICS_RAISE);
        let handle = analytics_batch_new(&opts, ptr::null_mut());
        assert!(!handle.is_null());

        assert_eq!(analytics_batch_coefficients(handle, ptr::null_mut(), 0), -1);

        let (x, y) = line(0..100);
        let code = analytics_batch_compute(handle, x.as_ptr(), 100, 1, y.as_ptr(), 1, ptr::null_mut());
        assert_eq!(code, 0);

        assert_eq!(analytics_batch_coefficients(handle, ptr::null_mut(), 0), 2);
        let beta = read_beta(2, |out, len| analytics_batch_coefficients(handle, out, len));
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-9);
        analytics_batch_free(handle);
    }
}

#[test]
fn test_online_blocks() {
    unsafe {
        let opts = options(ANALYTICS_LINEAR, ANALYTICS_QR, ANALYTICS_RAISE);
        let handle = analytics_online_new(&opts, ptr::null_mut());
        assert!(!handle.is_null());
        for block in 0..4 {
            let (x, y) = line(block * 25..(block + 1) * 25);
            let code = analytics_online_compute(handle, x.as_ptr(), 25, 1, y.as_ptr(), 1, ptr::null_mut());
            assert_eq!(code, 0);
        }
        assert_eq!(analytics_online_finalize(handle, ptr::null_mut()), 0);
        let beta = read_beta(2, |out, len| analytics_online_coefficients(handle, out, len));
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-9);
        analytics_online_free(handle);
    }
}

#[test]
fn test_distributed_workers() {
    unsafe {
        let opts = options(ANALYTICS_LINEAR, ANALYTICS_NORMAL_EQUATIONS, ANALYTICS_RAISE);
        let master = analytics_distributed_new(&opts, ptr::null_mut());
        assert!(!master.is_null());

        for worker in 0..4 {
            let local = analytics_online_new(&opts, ptr::null_mut());
            let (x, y) = line(worker * 25..(worker + 1) * 25);
            assert_eq!(
                analytics_online_compute(local, x.as_ptr(), 25, 1, y.as_ptr(), 1, ptr::null_mut()),
                0
            );
            let partial = analytics_online_take_partial(local);
            assert!(!partial.is_null());
            assert_eq!(analytics_distributed_add(master, partial), 0);
            analytics_online_free(local);
        }

        assert_eq!(analytics_distributed_compute(master, ptr::null_mut()), 0);
        assert_eq!(analytics_distributed_finalize(master, ptr::null_mut()), 0);
        let beta = read_beta(2, |out, len| analytics_distributed_coefficients(master, out, len));
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-9);

        // nothing queued after the collection was consumed
        let mut status = ptr::null_mut();
        assert_eq!(analytics_distributed_reset(master), 0);
        let code = analytics_distributed_compute(master, &mut status);
        assert_eq!(code, 2);
        assert_eq!(analytics_status_is_ok(status), 0);
        analytics_status_free(status);
        analytics_distributed_free(master);
    }
}

#[test]
fn test_ridge_with_qr_is_not_available() {
    unsafe {
        let ridge = [1.0];
        let mut opts = options(ANALYTICS_RIDGE, ANALYTICS_QR, ANALYTICS_RAISE);
        opts.ridge = ridge.as_ptr();
        opts.n_ridge = 1;

        let mut status = ptr::null_mut();
        let handle = analytics_batch_new(&opts, &mut status);
        assert!(handle.is_null());
        assert!(!status.is_null());
        assert_eq!(analytics_status_len(status), 1);
        assert_eq!(analytics_status_kind(status, 0), 1);
        assert_eq!(analytics_status_kind(status, 1), -1);
        analytics_status_free(status);
    }
}

#[test]
fn test_ridge_batch() {
    unsafe {
        let ridge = [0.0];
        let mut opts = options(ANALYTICS_RIDGE, ANALYTICS_NORMAL_EQUATIONS, ANALYTICS_RAISE);
        opts.ridge = ridge.as_ptr();
        opts.n_ridge = 1;
        let handle = analytics_batch_new(&opts, ptr::null_mut());
        assert!(!handle.is_null());

        let (x, y) = line(0..50);
        assert_eq!(
            analytics_batch_compute(handle, x.as_ptr(), 50, 1, y.as_ptr(), 1, ptr::null_mut()),
            0
        );
        let beta = read_beta(2, |out, len| analytics_batch_coefficients(handle, out, len));
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-9);
        analytics_batch_free(handle);
    }
}

#[test]
fn test_accumulated_status_description() {
    unsafe {
        let opts = options(ANALYTICS_LINEAR, ANALYTICS_NORMAL_EQUATIONS, ANALYTICS_ACCUMULATE);
        let handle = analytics_online_new(&opts, ptr::null_mut());

        let mut status = ptr::null_mut();
        let code = analytics_online_finalize(handle, &mut status);
        assert_eq!(code, 4);
        assert_eq!(analytics_status_is_ok(status), 0);

        let needed = analytics_status_description(status, ptr::null_mut(), 0);
        assert!(needed > 0);
        let mut buffer = vec![0 as c_char; needed as usize + 1];
        analytics_status_description(status, buffer.as_mut_ptr(), buffer.len() as u64);
        let text = std::ffi::CStr::from_ptr(buffer.as_ptr()).to_string_lossy().into_owned();
        assert_eq!(text.len(), needed as usize);
        assert!(!text.is_empty());

        let mut short = [0 as c_char; 4];
        analytics_status_description(status, short.as_mut_ptr(), 4);
        assert_eq!(short[3], 0);

        analytics_status_free(status);
        analytics_online_free(handle);
    }
}

#[test]
fn test_empty_rows() {
    unsafe {
        let opts = options(ANALYTICS_LINEAR, ANALYTICS_NORMAL_EQUATIONS, ANALYTICS_ACCUMULATE);
        let handle = analytics_batch_new(&opts, ptr::null_mut());
        let mut status = ptr::null_mut();
        let code = analytics_batch_compute(handle, ptr::null(), 0, 1, ptr::null(), 1, &mut status);
        assert_eq!(code, 2);
        assert_eq!(analytics_status_kind(status, 0), 2);
        analytics_status_free(status);
        analytics_batch_free(handle);
    }
}

#[test]
fn test_null_handles() {
    unsafe {
        let x = [1.0];
        assert_eq!(
            analytics_batch_compute(ptr::null_mut(), x.as_ptr(), 1, 1, x.as_ptr(), 1, ptr::null_mut()),
            ANALYTICS_NULL_POINTER
        );
        assert_eq!(analytics_online_finalize(ptr::null_mut(), ptr::null_mut()), ANALYTICS_NULL_POINTER);
        assert!(analytics_online_take_partial(ptr::null_mut()).is_null());
        assert!(analytics_batch_new(ptr::null(), ptr::null_mut()).is_null());
        assert_eq!(analytics_status_is_ok(ptr::null()), ANALYTICS_NULL_POINTER);
        analytics_batch_free(ptr::null_mut());
        analytics_status_free(ptr::null_mut());
    }
}
