/*!
 * Machine translation of source corpora.
 *
 * - `store`: durable, resumable mapping from index to translated record
 * - `batch`: batched, bounded-concurrency filling of stores
 */

pub use self::batch::{BatchTranslator, RunSummary, missing_indices};
pub use self::store::TranslationStore;

pub mod batch;
pub mod store;
