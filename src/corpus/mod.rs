/*!
 * Corpus data model and source loading.
 *
 * - `record`: translation records and their closed vocabularies
 * - `provider`: source corpus providers
 * - `tier`: raw/clean/superclean snapshots
 */

pub mod provider;
pub mod record;
pub mod tier;

pub use provider::{Corpus, CorpusProvider, LocalCorpusProvider};
pub use record::{CorpusName, Domain, PublishedRow, Split, TranslationRecord};
pub use tier::{Tier, TierDataset};
