//! Random debt networks for benchmarks and load tests.
