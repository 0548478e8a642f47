use hemolink_core::UserId;
use hemolink_donors::{DonorFilter, DonorProfile};

use crate::repository::Repository;

/// Donor directory search over stored profiles.
///
/// Open to any authenticated caller; the store only ever holds donor-role
/// profiles, so no extra role filtering is needed here.
pub struct DonorDirectory<P> {
    profiles: P,
}

impl<P> DonorDirectory<P>
where
    P: Repository<UserId, DonorProfile>,
{
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// All matching profiles, name-ordered. No pagination.
    pub fn search(&self, filter: &DonorFilter) -> Vec<DonorProfile> {
        let mut matches: Vec<DonorProfile> = self
            .profiles
            .list()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        matches.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use hemolink_core::BloodGroup;

    use crate::repository::InMemoryRepository;

    fn directory_with(
        profiles: Vec<DonorProfile>,
    ) -> DonorDirectory<Arc<InMemoryRepository<UserId, DonorProfile>>> {
        let store = Arc::new(InMemoryRepository::new());
        for profile in profiles {
            store.upsert(profile.user_id, profile);
        }
        DonorDirectory::new(store)
    }

    fn profile(name: &str, group: BloodGroup, city: &str, available: bool) -> DonorProfile {
        let mut p = DonorProfile::new(UserId::new(), name, group, Utc::now());
        p.city = city.to_string();
        p.is_available = available;
        p
    }

    #[test]
    fn combined_filters_narrow_results() {
        let directory = directory_with(vec![
            profile("Avery", BloodGroup::OPos, "Springfield", true),
            profile("Blake", BloodGroup::OPos, "Springfield", false),
            profile("Casey", BloodGroup::ANeg, "Springfield", true),
            profile("Drew", BloodGroup::OPos, "Shelbyville", true),
        ]);

        let matches = directory.search(&DonorFilter {
            blood_group: Some(BloodGroup::OPos),
            city: Some("spring".to_string()),
            is_available: Some(true),
        });

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Avery");
    }

    #[test]
    fn results_are_name_ordered() {
        let directory = directory_with(vec![
            profile("Casey", BloodGroup::OPos, "Springfield", true),
            profile("Avery", BloodGroup::OPos, "Springfield", true),
            profile("Blake", BloodGroup::OPos, "Springfield", true),
        ]);

        let names: Vec<String> = directory
            .search(&DonorFilter::default())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Avery", "Blake", "Casey"]);
    }
}
