pub mod category_repo;
pub mod install_repo;
pub mod request_repo;
pub mod skill_repo;

pub use category_repo::CategoryRepository;
pub use install_repo::InstallRepository;
pub use request_repo::SkillRequestRepository;
pub use skill_repo::SkillRepository;
