mod otp_algorithm;

pub use otp_algorithm::OtpAlgorithm;
