//! Static catalog of courses, job openings and career statistics.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCourse {
    pub title: &'static str,
    pub platform: &'static str,
    pub url: &'static str,
    pub skills: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogJob {
    pub role: &'static str,
    pub companies: &'static [&'static str],
    pub skills: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerStats {
    pub career: &'static str,
    pub growth: &'static str,
    pub median_salary: &'static str,
    pub demand: &'static str,
}

/// Maximum number of courses returned for one lookup.
const MAX_COURSES: usize = 5;

static COURSES: &[CatalogCourse] = &[
    CatalogCourse {
        title: "Machine Learning Fundamentals",
        platform: "Coursera",
        url: "https://www.coursera.org/learn/fundamentals-of-machine-learning-and-artificial-intelligence",
        skills: &["Machine Learning", "Python"],
    },
    CatalogCourse {
        title: "Web Development Bootcamp",
        platform: "Udemy",
        url: "https://www.udemy.com/course/the-complete-web-development-bootcamp/",
        skills: &["JavaScript", "HTML", "CSS"],
    },
    CatalogCourse {
        title: "Data Science with Python",
        platform: "edX",
        url: "https://www.edx.org/learn/data-science/harvard-university-introduction-to-data-science-with-python",
        skills: &["Python", "Data Analysis", "Statistics"],
    },
    CatalogCourse {
        title: "AI for Everyone",
        platform: "Coursera",
        url: "https://www.coursera.org/learn/ai-for-everyone",
        skills: &["Artificial Intelligence", "Machine Learning"],
    },
    CatalogCourse {
        title: "Cloud Computing Essentials",
        platform: "Udacity",
        url: "https://www.udacity.com/course/cloud-fundamentals--cd12097",
        skills: &["AWS", "Cloud Computing", "DevOps"],
    },
];

static JOBS: &[CatalogJob] = &[
    CatalogJob {
        role: "Frontend Developer",
        companies: &["Google", "Facebook", "Netflix"],
        skills: &["JavaScript", "React", "CSS"],
    },
    CatalogJob {
        role: "Data Scientist",
        companies: &["Amazon", "Microsoft", "Twitter"],
        skills: &["Python", "Machine Learning", "Statistics"],
    },
    CatalogJob {
        role: "DevOps Engineer",
        companies: &["Netflix", "Amazon", "Spotify"],
        skills: &["AWS", "Docker", "Kubernetes"],
    },
    CatalogJob {
        role: "UX Designer",
        companies: &["Apple", "Adobe", "Airbnb"],
        skills: &["UI/UX", "Figma", "User Research"],
    },
    CatalogJob {
        role: "Product Manager",
        companies: &["Google", "Microsoft", "Slack"],
        skills: &["Product Strategy", "Agile", "Market Research"],
    },
];

static CAREER_STATS: &[CareerStats] = &[
    CareerStats {
        career: "Software Engineer",
        growth: "22%",
        median_salary: "$110,000",
        demand: "High",
    },
    CareerStats {
        career: "Data Scientist",
        growth: "31%",
        median_salary: "$120,000",
        demand: "Very High",
    },
    CareerStats {
        career: "UX Designer",
        growth: "15%",
        median_salary: "$85,000",
        demand: "Medium",
    },
    CareerStats {
        career: "Product Manager",
        growth: "10%",
        median_salary: "$105,000",
        demand: "High",
    },
    CareerStats {
        career: "DevOps Engineer",
        growth: "21%",
        median_salary: "$115,000",
        demand: "High",
    },
];

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Courses teaching any of `skills`, matched by case-insensitive substring.
pub fn courses_for_skills(skills: &[String]) -> Vec<CatalogCourse> {
    let wanted: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if wanted.is_empty() {
        return Vec::new();
    }

    COURSES
        .iter()
        .filter(|course| {
            course
                .skills
                .iter()
                .any(|skill| wanted.iter().any(|w| contains_ignore_case(skill, w)))
        })
        .take(MAX_COURSES)
        .cloned()
        .collect()
}

/// Job openings whose role contains `role`.
pub fn jobs_for_role(role: &str) -> Vec<CatalogJob> {
    let role = role.trim();
    if role.is_empty() {
        return Vec::new();
    }

    JOBS.iter()
        .filter(|job| contains_ignore_case(job.role, role))
        .cloned()
        .collect()
}

/// First statistics row whose career contains `career_path`.
pub fn stats_for_career(career_path: &str) -> Option<CareerStats> {
    let career_path = career_path.trim();
    if career_path.is_empty() {
        return None;
    }

    CAREER_STATS
        .iter()
        .find(|stats| contains_ignore_case(stats.career, career_path))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_courses_match_by_substring() {
        let courses = courses_for_skills(&skills(&["python"]));
        let titles: Vec<&str> = courses.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec!["Machine Learning Fundamentals", "Data Science with Python"]
        );

        let courses = courses_for_skills(&skills(&["learn"]));
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn test_courses_capped_at_five() {
        let courses = courses_for_skills(&skills(&["a", "e", "i", "o", "u"]));
        assert!(courses.len() <= 5);
    }

    #[test]
    fn test_courses_empty_input() {
        assert!(courses_for_skills(&[]).is_empty());
        assert!(courses_for_skills(&skills(&["  "])).is_empty());
    }

    #[test]
    fn test_jobs_for_role() {
        let jobs = jobs_for_role("engineer");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].role, "DevOps Engineer");

        assert!(jobs_for_role("").is_empty());
        assert!(jobs_for_role("astronaut").is_empty());
    }

    #[test]
    fn test_stats_for_career() {
        let stats = stats_for_career("data").expect("stats");
        assert_eq!(stats.career, "Data Scientist");
        assert_eq!(stats.demand, "Very High");

        assert!(stats_for_career("astronaut").is_none());
        assert!(stats_for_career("").is_none());
    }
}
