//! Frame throttling policy.
//!
//! Raw camera frame rates far exceed what form analysis needs, so only every
//! Nth frame is scored. The throttle owns a monotonic frame counter that
//! increments on every submission regardless of outcome; overflow wraps,
//! which is fine since the counter is only used modularly.

use crate::{Error, Result};

/// Decides which incoming frames are processed, given a configured stride.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    stride: u32,
    frame_count: u32,
}

impl FrameThrottle {
    /// Create a throttle processing every `stride`-th frame.
    ///
    /// A stride of 1 processes everything; typical values are 2 or 3.
    /// Zero is rejected up front rather than silently corrected.
    pub fn new(stride: u32) -> Result<Self> {
        if stride == 0 {
            return Err(Error::Config("frame stride must be at least 1".into()));
        }
        Ok(Self {
            stride,
            frame_count: 0,
        })
    }

    /// Record one incoming frame and decide whether it should be processed.
    ///
    /// The counter advances on every call, so for stride N exactly one of
    /// every N consecutive calls returns true, starting with the Nth.
    pub fn should_process(&mut self) -> bool {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.frame_count % self.stride == 0
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stride_rejected() {
        assert!(matches!(FrameThrottle::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_stride_one_processes_everything() {
        let mut throttle = FrameThrottle::new(1).unwrap();
        for _ in 0..10 {
            assert!(throttle.should_process());
        }
    }

    #[test]
    fn test_stride_three_processes_every_third() {
        let mut throttle = FrameThrottle::new(3).unwrap();

        let decisions: Vec<bool> = (0..9).map(|_| throttle.should_process()).collect();
        assert_eq!(
            decisions,
            vec![false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_exactly_one_per_stride_window() {
        for stride in 1..=6u32 {
            let mut throttle = FrameThrottle::new(stride).unwrap();
            for window in 0..4 {
                let processed = (0..stride).filter(|_| throttle.should_process()).count();
                assert_eq!(processed, 1, "stride {} window {}", stride, window);
            }
        }
    }

    #[test]
    fn test_counter_wraps_without_panic() {
        let mut throttle = FrameThrottle::new(2).unwrap();
        throttle.frame_count = u32::MAX;
        // Wraps to 0, which is divisible by the stride.
        assert!(throttle.should_process());
        assert!(!throttle.should_process());
    }
}
