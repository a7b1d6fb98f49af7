// End-to-end tests for the TTS batch backend API
//
// Each test gets its own TestContext: a fresh temporary artifact store, a
// scriptable fake TTS engine and the real router served on 127.0.0.1:0.
// Nothing is shared between tests, so they run in parallel.

mod helpers;
mod test_archive;
