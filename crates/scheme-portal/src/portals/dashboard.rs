use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub title: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: &'static str,
    pub value: f64,
}

/// Named chart series; rendering is left to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    pub name: &'static str,
    pub points: Vec<DataPoint>,
}

impl DataSeries {
    fn new(name: &'static str, points: &[(&'static str, f64)]) -> Self {
        Self {
            name,
            points: points
                .iter()
                .map(|(label, value)| DataPoint {
                    label: *label,
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.value).sum()
    }

    pub fn peak(&self) -> Option<&DataPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }
}

/// Hard-coded leadership dashboard for a portal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub kpis: Vec<Kpi>,
    pub series: Vec<DataSeries>,
}

impl DashboardSnapshot {
    pub fn samridh() -> Self {
        Self {
            kpis: vec![
                Kpi {
                    title: "Applications",
                    value: 1284.0,
                },
                Kpi {
                    title: "Shortlisted",
                    value: 184.0,
                },
                Kpi {
                    title: "Cohorts",
                    value: 12.0,
                },
                Kpi {
                    title: "Disbursed (₹ Cr)",
                    value: 42.6,
                },
            ],
            series: vec![
                DataSeries::new(
                    "Applications by State",
                    &[
                        ("KA", 210.0),
                        ("MH", 190.0),
                        ("DL", 140.0),
                        ("TN", 120.0),
                        ("GJ", 95.0),
                    ],
                ),
                DataSeries::new(
                    "Applications by Sector",
                    &[
                        ("HealthTech", 26.0),
                        ("FinTech", 19.0),
                        ("IoT", 17.0),
                        ("AI/ML", 22.0),
                        ("GovTech", 16.0),
                    ],
                ),
            ],
        }
    }

    pub fn genesis() -> Self {
        Self {
            kpis: vec![
                Kpi {
                    title: "Applicants",
                    value: 892.0,
                },
                Kpi {
                    title: "Shortlisted",
                    value: 112.0,
                },
                Kpi {
                    title: "Pilots",
                    value: 37.0,
                },
                Kpi {
                    title: "Funds (₹ Cr)",
                    value: 18.4,
                },
            ],
            series: vec![
                DataSeries::new(
                    "Applications Trend",
                    &[
                        ("Apr", 20.0),
                        ("May", 138.0),
                        ("Jun", 316.0),
                        ("Jul", 540.0),
                        ("Aug", 770.0),
                        ("Sep", 892.0),
                    ],
                ),
                DataSeries::new(
                    "Sector Mix",
                    &[
                        ("HealthTech", 32.0),
                        ("EdTech", 24.0),
                        ("AgriTech", 18.0),
                        ("DeepTech", 14.0),
                        ("Other", 12.0),
                    ],
                ),
            ],
        }
    }

    pub fn series(&self, name: &str) -> Option<&DataSeries> {
        self.series.iter().find(|series| series.name == name)
    }
}
