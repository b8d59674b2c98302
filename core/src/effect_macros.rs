//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust
/// use artistly_core::async_effect;
/// use artistly_core::effect::Effect;
///
/// #[derive(Debug)]
/// enum UploadAction {
///     Encoded { len: usize },
/// }
///
/// let bytes = vec![1_u8, 2, 3];
/// let effect: Effect<UploadAction> = async_effect! {
///     Some(UploadAction::Encoded { len: bytes.len() })
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust
/// use artistly_core::delay;
/// use artistly_core::effect::Effect;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum ToastAction {
///     Dismiss { id: u64 },
/// }
///
/// let effect = delay! {
///     duration: Duration::from_secs(5),
///     action: ToastAction::Dismiss { id: 1 }
/// };
/// assert!(matches!(effect, Effect::Delay { .. }));
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        ImageLoaded { len: usize },
        ToastExpired,
    }

    #[test]
    fn test_async_effect_macro() {
        let payload = vec![0_u8; 3];
        let effect = async_effect! {
            Some(TestAction::ImageLoaded { len: payload.len() })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! must build a Future effect");
        };
        assert_eq!(
            tokio_test::block_on(fut),
            Some(TestAction::ImageLoaded { len: 3 })
        );
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::ToastExpired
        };

        assert!(matches!(
            effect,
            Effect::Delay { duration, ref action }
                if duration == Duration::from_secs(30) && **action == TestAction::ToastExpired
        ));
    }
}
