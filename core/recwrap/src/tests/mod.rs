//! バイナリ全体のテスト（モック注入でユースケースを通す）

mod record_tests;
