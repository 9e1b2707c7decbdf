// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures: a generated test pattern, a scriptable provider and
//! recording host services.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uia_pattern::{
    pattern, pattern_client, AssignedIds, AugmentationService, Guid, HostError, PatternSubmission,
    ProviderError, RegisteredPattern, RegistrationService,
};

pub const TEST_PATTERN_GUID: Guid = Guid::from_u128(0xE69F_099B_7519_4CE7_9D61_7714_6DCB_1B4A);
pub const TEST_PROVIDER_IID: Guid = Guid::from_u128(0x965D_7E12_F5F5_42F9_9D72_75AA_A7AE_8FFD);
pub const TEST_CLIENT_IID: Guid = Guid::from_u128(0x267D_23B7_6B12_4679_ACF0_E8FA_0FB3_BDD7);
pub const BOOL_PROPERTY_GUID: Guid = Guid::from_u128(0xDD33_9FFB_E244_41A2_A8A2_787F_722C_582B);
pub const INT_PROPERTY_GUID: Guid = Guid::from_u128(0xC698_1328_E9B5_4EA1_AB21_A483_D50D_95BF);
pub const CHANGED_EVENT_GUID: Guid = Guid::from_u128(0x5B9E_4C2A_7D31_4F08_8E6A_1C3B_5D7F_9A2E);

#[pattern(
    name = "AttrDrivenTestPattern",
    guid = "E69F099B-7519-4CE7-9D61-77146DCB1B4A",
    provider_iid = "965D7E12-F5F5-42F9-9D72-75AAA7AE8FFD",
    event(name = "ValueChanged", guid = "5B9E4C2A-7D31-4F08-8E6A-1C3B5D7F9A2E"),
)]
pub trait AttrDrivenTestProvider: Send + Sync {
    #[property(guid = "DD339FFB-E244-41A2-A8A2-787F722C582B")]
    fn bool_property(&self) -> Result<bool, ProviderError>;

    #[property(guid = "C6981328-E9B5-4EA1-AB21-A483D50D95BF")]
    fn int_property(&self) -> Result<i32, ProviderError>;

    #[method]
    fn void_parameterless_method(&self) -> Result<(), ProviderError>;

    #[method(focus)]
    fn bool_parameterless_method_with_do_set_focus(&self) -> Result<bool, ProviderError>;

    #[method]
    fn int_method_with_double_param(&self, double_in: f64) -> Result<i32, ProviderError>;

    #[method]
    fn bool_method_with_in_and_out_params(
        &self,
        int_in: i32,
        string_out: &mut String,
    ) -> Result<bool, ProviderError>;

    /// Plain helper, not a pattern member.
    fn call_count(&self) -> usize;
}

#[pattern_client(iid = "267D23B7-6B12-4679-ACF0-E8FA0FB3BDD7")]
pub trait AttrDrivenTestPattern {}

/// Provider answering with fixed values and logging each call.
#[derive(Default)]
pub struct TestProvider {
    pub bool_value: bool,
    pub int_value: i32,
    pub fail: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl TestProvider {
    pub fn new(bool_value: bool, int_value: i32) -> Self {
        Self {
            bool_value,
            int_value,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn enter(&self, member: &'static str) -> Result<(), ProviderError> {
        self.calls.lock().push(member);
        if self.fail {
            Err(ProviderError::element_not_available())
        } else {
            Ok(())
        }
    }
}

impl AttrDrivenTestProvider for TestProvider {
    fn bool_property(&self) -> Result<bool, ProviderError> {
        self.enter("BoolProperty")?;
        Ok(self.bool_value)
    }

    fn int_property(&self) -> Result<i32, ProviderError> {
        self.enter("IntProperty")?;
        Ok(self.int_value)
    }

    fn void_parameterless_method(&self) -> Result<(), ProviderError> {
        self.enter("VoidParameterlessMethod")
    }

    fn bool_parameterless_method_with_do_set_focus(&self) -> Result<bool, ProviderError> {
        self.enter("BoolParameterlessMethodWithDoSetFocus")?;
        Ok(self.bool_value)
    }

    fn int_method_with_double_param(&self, double_in: f64) -> Result<i32, ProviderError> {
        self.enter("IntMethodWithDoubleParam")?;
        Ok(double_in.round() as i32)
    }

    fn bool_method_with_in_and_out_params(
        &self,
        int_in: i32,
        string_out: &mut String,
    ) -> Result<bool, ProviderError> {
        self.enter("BoolMethodWithInAndOutParams")?;
        *string_out = int_in.to_string();
        Ok(int_in > 0)
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

/// Host registration service that records submissions and hands out ids
/// from a fixed base.
pub struct RecordingHost {
    base: i32,
    calls: AtomicUsize,
    submissions: Mutex<Vec<PatternSubmission>>,
    fail_next: Mutex<Option<HostError>>,
    drop_property_id: AtomicBool,
}

impl RecordingHost {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            drop_property_id: AtomicBool::new(false),
        }
    }

    /// Fail the next registration call with `error`.
    pub fn fail_next(&self, error: HostError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Answer with one property id short.
    pub fn drop_property_id(&self, enabled: bool) {
        self.drop_property_id.store(enabled, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_submission(&self) -> Option<PatternSubmission> {
        self.submissions.lock().last().cloned()
    }
}

impl RegistrationService for RecordingHost {
    fn register_pattern(&self, submission: &PatternSubmission) -> Result<AssignedIds, HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().push(submission.clone());
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }

        let properties = submission.properties.len() as i32;
        let events = submission.events.len() as i32;
        let mut property_ids: Vec<i32> = (0..properties).map(|i| self.base + 2 + i).collect();
        if self.drop_property_id.load(Ordering::SeqCst) {
            property_ids.pop();
        }
        Ok(AssignedIds {
            pattern_id: self.base,
            availability_property_id: self.base + 1,
            property_ids,
            event_ids: (0..events).map(|i| self.base + 2 + properties + i).collect(),
        })
    }
}

/// Secondary registration that records what it saw.
#[derive(Default)]
pub struct RecordingAugmentation {
    pub fail: bool,
    pub seen: Mutex<Vec<(String, i32)>>,
}

impl AugmentationService for RecordingAugmentation {
    fn augment(&self, pattern: &RegisteredPattern<'_>) -> Result<(), HostError> {
        self.seen
            .lock()
            .push((pattern.submission.name.clone(), pattern.ids.pattern_id));
        if self.fail {
            Err(HostError::new(uia_pattern::config::E_FAIL, "peer augmentation refused"))
        } else {
            Ok(())
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
