//! C bindings for linear and ridge regression
//!
//! Every container lives behind an opaque handle created by a `*_new`
//! function and released by the matching `*_free`. Data is passed as
//! row-major `double` buffers that are only read for the duration of the call.
//!
//! Calls that can fail return `0` on success, the `ErrorKind` code of the
//! first recorded error otherwise, and `-1` when a required pointer is null.
//! When `status` is non-null it receives a new status handle describing the
//! call, which the caller frees with [`analytics_status_free`].

#![allow(clippy::missing_safety_doc)]

use analytics_core::{
    BatchContainer, DistributedContainer, Environment, Error, ErrorPolicy, Layout,
    OnlineContainer, PartialModels, Result, Status, TableView,
};
use analytics_regression::{
    LinearRegression, RegressionMethod, RegressionModel, RegressionPartial, RidgeParameter,
    RidgeRegression, TrainingInput, TrainingParameter,
};
use std::os::raw::{c_char, c_double, c_int, c_long, c_ulong};
use std::ptr;
use tracing::debug;

pub const ANALYTICS_NULL_POINTER: c_int = -1;

pub const ANALYTICS_LINEAR: c_int = 0;
pub const ANALYTICS_RIDGE: c_int = 1;

pub const ANALYTICS_NORMAL_EQUATIONS: c_int = 0;
pub const ANALYTICS_QR: c_int = 1;

pub const ANALYTICS_RAISE: c_int = 0;
pub const ANALYTICS_ACCUMULATE: c_int = 1;

/// Construction options shared by every training handle
#[repr(C)]
pub struct AnalyticsTrainingOptions {
    /// `ANALYTICS_LINEAR` or `ANALYTICS_RIDGE`
    pub algorithm: c_int,
    /// `ANALYTICS_NORMAL_EQUATIONS` or `ANALYTICS_QR`
    pub method: c_int,
    /// Nonzero to fit an intercept
    pub intercept: c_int,
    /// Ridge values, one or one per response; ignored for linear regression
    pub ridge: *const c_double,
    pub n_ridge: c_ulong,
    /// `ANALYTICS_RAISE`, `ANALYTICS_ACCUMULATE`, anything else for the process default
    pub error_policy: c_int,
}

/// Outcome of a call
pub struct AnalyticsStatus {
    status: Status,
}

/// Partial result moved out of an online handle
pub struct AnalyticsPartial {
    partial: RegressionPartial,
}

enum Batch {
    Linear(BatchContainer<LinearRegression<f64>>),
    Ridge(BatchContainer<RidgeRegression<f64>>),
}

enum Online {
    Linear(OnlineContainer<LinearRegression<f64>>),
    Ridge(OnlineContainer<RidgeRegression<f64>>),
}

enum Distributed {
    Linear(DistributedContainer<LinearRegression<f64>>),
    Ridge(DistributedContainer<RidgeRegression<f64>>),
}

pub struct AnalyticsBatch {
    trainer: Batch,
}

pub struct AnalyticsOnline {
    trainer: Online,
}

pub struct AnalyticsDistributed {
    trainer: Distributed,
    collection: PartialModels<RegressionPartial>,
}

/// Run `$body` with `$c` bound to whichever container the enum holds
macro_rules! with_trainer {
    ($kind:ident, $trainer:expr, $c:ident => $body:expr) => {
        match $trainer {
            $kind::Linear($c) => $body,
            $kind::Ridge($c) => $body,
        }
    };
}

/// Parsed form of [`AnalyticsTrainingOptions`]
struct Options {
    env: Environment,
    ridge: bool,
    method: RegressionMethod,
    linear: TrainingParameter,
    ridge_parameter: RidgeParameter,
}

unsafe fn parse_options(options: &AnalyticsTrainingOptions) -> Result<Options> {
    let policy = match options.error_policy {
        ANALYTICS_RAISE => ErrorPolicy::Raise,
        ANALYTICS_ACCUMULATE => ErrorPolicy::Accumulate,
        _ => Environment::global().error_policy(),
    };
    let env = Environment::global().with_error_policy(policy);

    let method = match options.method {
        ANALYTICS_NORMAL_EQUATIONS => RegressionMethod::NormalEquations,
        ANALYTICS_QR => RegressionMethod::Qr,
        other => {
            return Err(Error::InvalidParameter(format!(
                "unknown method code {other}"
            )))
        }
    };
    let ridge = match options.algorithm {
        ANALYTICS_LINEAR => false,
        ANALYTICS_RIDGE => true,
        other => {
            return Err(Error::InvalidParameter(format!(
                "unknown algorithm code {other}"
            )))
        }
    };

    let linear = TrainingParameter {
        intercept: options.intercept != 0,
    };
    let values = if options.ridge.is_null() || options.n_ridge == 0 {
        vec![1.0]
    } else {
        std::slice::from_raw_parts(options.ridge, options.n_ridge as usize).to_vec()
    };
    let ridge_parameter = RidgeParameter::per_response(values).with_intercept(linear.intercept);

    Ok(Options {
        env,
        ridge,
        method,
        linear,
        ridge_parameter,
    })
}

unsafe fn write_status(out: *mut *mut AnalyticsStatus, status: Status) {
    if !out.is_null() {
        *out = Box::into_raw(Box::new(AnalyticsStatus { status }));
    }
}

/// Fold a call outcome into a return code and an optional status handle
unsafe fn finish(outcome: Result<Status>, out: *mut *mut AnalyticsStatus) -> c_int {
    let status = outcome.unwrap_or_else(Status::from_error);
    let code = status.iter().next().map_or(0, |e| e.kind().code());
    if code != 0 {
        debug!(code, "call reported errors");
    }
    write_status(out, status);
    code
}

/// Build a handle or report why it could not be built
unsafe fn construct<H>(
    options: *const AnalyticsTrainingOptions,
    status: *mut *mut AnalyticsStatus,
    build: impl FnOnce(Options) -> Result<H>,
) -> *mut H {
    if options.is_null() {
        return ptr::null_mut();
    }
    let built = parse_options(&*options).and_then(build);
    match built {
        Ok(handle) => {
            write_status(status, Status::new(ErrorPolicy::Accumulate));
            Box::into_raw(Box::new(handle))
        }
        Err(e) => {
            write_status(status, Status::from_error(e));
            ptr::null_mut()
        }
    }
}

/// View caller memory as a table, rejecting null buffers with rows
unsafe fn view<'a>(data: *const c_double, n_rows: c_ulong, n_columns: c_ulong) -> Option<TableView<'a, f64>> {
    let (rows, columns) = (n_rows as usize, n_columns as usize);
    let slice: &[f64] = if rows == 0 || columns == 0 {
        &[]
    } else if data.is_null() {
        return None;
    } else {
        std::slice::from_raw_parts(data, rows.checked_mul(columns)?)
    };
    TableView::new(slice, rows, columns, Layout::RowMajor).ok()
}

/// Copy a model's coefficient matrix into `out`
///
/// Returns the number of values in the matrix, or -1 when there is no model.
/// Nothing is copied when `len` is too small.
unsafe fn copy_beta(model: Option<&RegressionModel<f64>>, out: *mut c_double, len: c_ulong) -> c_long {
    let Some(model) = model else {
        return -1;
    };
    let beta = model.beta();
    if !out.is_null() && len as usize >= beta.len() {
        ptr::copy_nonoverlapping(beta.as_ptr(), out, beta.len());
    }
    beta.len() as c_long
}

// Status

#[no_mangle]
pub unsafe extern "C" fn analytics_status_free(status: *mut AnalyticsStatus) {
    if !status.is_null() {
        drop(Box::from_raw(status));
    }
}

/// 1 when the status holds no errors, 0 otherwise
#[no_mangle]
pub unsafe extern "C" fn analytics_status_is_ok(status: *const AnalyticsStatus) -> c_int {
    match status.as_ref() {
        Some(s) => c_int::from(s.status.is_ok()),
        None => ANALYTICS_NULL_POINTER,
    }
}

#[no_mangle]
pub unsafe extern "C" fn analytics_status_len(status: *const AnalyticsStatus) -> c_ulong {
    status.as_ref().map_or(0, |s| s.status.len() as c_ulong)
}

/// Kind code of error `index`, or -1 when out of range
#[no_mangle]
pub unsafe extern "C" fn analytics_status_kind(status: *const AnalyticsStatus, index: c_ulong) -> c_int {
    status
        .as_ref()
        .and_then(|s| s.status.errors().get(index as usize))
        .map_or(ANALYTICS_NULL_POINTER, |e| e.kind().code())
}

/// Write the description, one error per line, as a NUL-terminated string
///
/// Returns the full description length without the terminator; the text is
/// truncated to `len - 1` bytes when the buffer is shorter.
#[no_mangle]
pub unsafe extern "C" fn analytics_status_description(
    status: *const AnalyticsStatus,
    buffer: *mut c_char,
    len: c_ulong,
) -> c_ulong {
    let Some(status) = status.as_ref() else {
        return 0;
    };
    let text = status.status.description();
    let bytes = text.as_bytes();
    if !buffer.is_null() && len > 0 {
        let n = bytes.len().min(len as usize - 1);
        ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, buffer, n);
        *buffer.add(n) = 0;
    }
    bytes.len() as c_ulong
}

// Batch

#[no_mangle]
pub unsafe extern "C" fn analytics_batch_new(
    options: *const AnalyticsTrainingOptions,
    status: *mut *mut AnalyticsStatus,
) -> *mut AnalyticsBatch {
    construct(options, status, |o| {
        let trainer = if o.ridge {
            Batch::Ridge(BatchContainer::new(&o.env, o.method, o.ridge_parameter)?)
        } else {
            Batch::Linear(BatchContainer::new(&o.env, o.method, o.linear)?)
        };
        Ok(AnalyticsBatch { trainer })
    })
}

/// Train on `n_rows` rows of `n_features` inputs and `n_responses` outputs
#[no_mangle]
pub unsafe extern "C" fn analytics_batch_compute(
    handle: *mut AnalyticsBatch,
    x: *const c_double,
    n_rows: c_ulong,
    n_features: c_ulong,
    y: *const c_double,
    n_responses: c_ulong,
    status: *mut *mut AnalyticsStatus,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    let (Some(xv), Some(yv)) = (view(x, n_rows, n_features), view(y, n_rows, n_responses)) else {
        return ANALYTICS_NULL_POINTER;
    };
    let input = TrainingInput::new(&xv, &yv);
    finish(with_trainer!(Batch, &mut handle.trainer, c => c.compute(&input)), status)
}

#[no_mangle]
pub unsafe extern "C" fn analytics_batch_coefficients(
    handle: *const AnalyticsBatch,
    out: *mut c_double,
    len: c_ulong,
) -> c_long {
    let Some(handle) = handle.as_ref() else {
        return -1;
    };
    copy_beta(with_trainer!(Batch, &handle.trainer, c => c.result()), out, len)
}

#[no_mangle]
pub unsafe extern "C" fn analytics_batch_free(handle: *mut AnalyticsBatch) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

// Online

#[no_mangle]
pub unsafe extern "C" fn analytics_online_new(
    options: *const AnalyticsTrainingOptions,
    status: *mut *mut AnalyticsStatus,
) -> *mut AnalyticsOnline {
    construct(options, status, |o| {
        let trainer = if o.ridge {
            Online::Ridge(OnlineContainer::new(&o.env, o.method, o.ridge_parameter)?)
        } else {
            Online::Linear(OnlineContainer::new(&o.env, o.method, o.linear)?)
        };
        Ok(AnalyticsOnline { trainer })
    })
}

/// Fold one block of rows into the handle's partial result
#[no_mangle]
pub unsafe extern "C" fn analytics_online_compute(
    handle: *mut AnalyticsOnline,
    x: *const c_double,
    n_rows: c_ulong,
    n_features: c_ulong,
    y: *const c_double,
    n_responses: c_ulong,
    status: *mut *mut AnalyticsStatus,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    let (Some(xv), Some(yv)) = (view(x, n_rows, n_features), view(y, n_rows, n_responses)) else {
        return ANALYTICS_NULL_POINTER;
    };
    let input = TrainingInput::new(&xv, &yv);
    finish(with_trainer!(Online, &mut handle.trainer, c => c.compute(&input)), status)
}

#[no_mangle]
pub unsafe extern "C" fn analytics_online_finalize(
    handle: *mut AnalyticsOnline,
    status: *mut *mut AnalyticsStatus,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    finish(with_trainer!(Online, &mut handle.trainer, c => c.finalize_compute()), status)
}

/// Move the accumulated partial result out, leaving the handle empty
#[no_mangle]
pub unsafe extern "C" fn analytics_online_take_partial(handle: *mut AnalyticsOnline) -> *mut AnalyticsPartial {
    let Some(handle) = handle.as_mut() else {
        return ptr::null_mut();
    };
    let partial = with_trainer!(Online, &mut handle.trainer, c => c.take_partial_result());
    Box::into_raw(Box::new(AnalyticsPartial { partial }))
}

#[no_mangle]
pub unsafe extern "C" fn analytics_online_coefficients(
    handle: *const AnalyticsOnline,
    out: *mut c_double,
    len: c_ulong,
) -> c_long {
    let Some(handle) = handle.as_ref() else {
        return -1;
    };
    copy_beta(with_trainer!(Online, &handle.trainer, c => c.result()), out, len)
}

#[no_mangle]
pub unsafe extern "C" fn analytics_online_free(handle: *mut AnalyticsOnline) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

#[no_mangle]
pub unsafe extern "C" fn analytics_partial_free(partial: *mut AnalyticsPartial) {
    if !partial.is_null() {
        drop(Box::from_raw(partial));
    }
}

// Distributed

#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_new(
    options: *const AnalyticsTrainingOptions,
    status: *mut *mut AnalyticsStatus,
) -> *mut AnalyticsDistributed {
    construct(options, status, |o| {
        let trainer = if o.ridge {
            Distributed::Ridge(DistributedContainer::new(&o.env, o.method, o.ridge_parameter)?)
        } else {
            Distributed::Linear(DistributedContainer::new(&o.env, o.method, o.linear)?)
        };
        Ok(AnalyticsDistributed {
            trainer,
            collection: PartialModels::new(),
        })
    })
}

/// Queue a worker's partial result; the handle takes ownership of `partial`
#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_add(
    handle: *mut AnalyticsDistributed,
    partial: *mut AnalyticsPartial,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    if partial.is_null() {
        return ANALYTICS_NULL_POINTER;
    }
    handle.collection.push(Box::from_raw(partial).partial);
    0
}

/// Merge every queued partial result into the master state
#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_compute(
    handle: *mut AnalyticsDistributed,
    status: *mut *mut AnalyticsStatus,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    let collection = &mut handle.collection;
    finish(
        with_trainer!(Distributed, &mut handle.trainer, c => c.compute(collection)),
        status,
    )
}

#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_finalize(
    handle: *mut AnalyticsDistributed,
    status: *mut *mut AnalyticsStatus,
) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    finish(
        with_trainer!(Distributed, &mut handle.trainer, c => c.finalize_compute()),
        status,
    )
}

/// Drop the master state to start a new round
#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_reset(handle: *mut AnalyticsDistributed) -> c_int {
    let Some(handle) = handle.as_mut() else {
        return ANALYTICS_NULL_POINTER;
    };
    with_trainer!(Distributed, &mut handle.trainer, c => c.reset());
    handle.collection.clear();
    0
}

#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_coefficients(
    handle: *const AnalyticsDistributed,
    out: *mut c_double,
    len: c_ulong,
) -> c_long {
    let Some(handle) = handle.as_ref() else {
        return -1;
    };
    copy_beta(with_trainer!(Distributed, &handle.trainer, c => c.result()), out, len)
}

#[no_mangle]
pub unsafe extern "C" fn analytics_distributed_free(handle: *mut AnalyticsDistributed) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}
