use super::{CatalogError, ContentCatalog, Question, Section};

impl ContentCatalog {
    /// The built-in AI readiness catalog: six sections, twenty questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only if the built-in content is malformed.
    #[allow(clippy::too_many_lines)]
    pub fn reference() -> Result<Self, CatalogError> {
        ContentCatalog::new(vec![
            Section::new(
                "section1",
                "Data Infrastructure & Quality",
                "Evaluate your organization's data collection, quality, integration, governance, and processing capabilities",
                vec![
                    Question::new(
                        "1.1",
                        "section1",
                        "Data Availability",
                        "How much business data do you currently collect and store digitally?",
                        [
                            "Minimal: Less than 20% of business processes generate digital data",
                            "Limited: 20-40% of processes generate digital data, mostly basic records",
                            "Moderate: 40-60% of processes digitized, some customer and operational data",
                            "Good: 60-80% digital, comprehensive customer, sales, and operational data",
                            "Excellent: 80%+ fully digital operations with rich, detailed data across all functions",
                        ],
                    ),
                    Question::new(
                        "1.2",
                        "section1",
                        "Data Quality",
                        "How would you rate the accuracy, completeness, and consistency of your business data?",
                        [
                            "Poor: Significant gaps, errors, and inconsistencies in most data",
                            "Below Average: Some data quality issues, requires substantial cleaning",
                            "Average: Generally reliable but needs regular cleaning and validation",
                            "Good: High quality with minor issues, occasional cleaning needed",
                            "Excellent: Very high quality, standardized, regularly validated data",
                        ],
                    ),
                    Question::new(
                        "1.3",
                        "section1",
                        "Data Integration",
                        "How well are your different business systems connected and able to share data?",
                        [
                            "Isolated: Systems operate in silos, manual data transfer required",
                            "Limited: Some basic integrations, mostly manual processes",
                            "Moderate: Key systems connected, some automated data flow",
                            "Good: Most systems integrated with automated data sharing",
                            "Excellent: Fully integrated data ecosystem with real-time synchronization",
                        ],
                    ),
                    Question::new(
                        "1.4",
                        "section1",
                        "Data Governance",
                        "Do you have policies and procedures for managing data access, quality, and security?",
                        [
                            "None: No formal data governance policies or procedures",
                            "Basic: Informal practices, no documented policies",
                            "Developing: Some policies documented, inconsistent implementation",
                            "Established: Clear policies and procedures, mostly followed",
                            "Mature: Comprehensive governance framework, consistently enforced",
                        ],
                    ),
                    Question::new(
                        "1.5",
                        "section1",
                        "Data Storage & Processing Capacity",
                        "What is your current capacity for storing and processing large amounts of data?",
                        [
                            "Limited: Basic storage, manual processing, frequent capacity issues",
                            "Basic: Adequate storage for current needs, limited processing power",
                            "Moderate: Good storage and processing for current operations",
                            "Good: Scalable infrastructure that can handle growth",
                            "Excellent: Advanced cloud/hybrid infrastructure with auto-scaling capabilities",
                        ],
                    ),
                ],
            ),
            Section::new(
                "section2",
                "Technology Infrastructure",
                "Assess your IT systems maturity, cloud readiness, connectivity, and security infrastructure",
                vec![
                    Question::new(
                        "2.1",
                        "section2",
                        "IT Systems Maturity",
                        "How modern and capable are your current IT systems?",
                        [
                            "Legacy: Outdated systems, limited functionality, frequent issues",
                            "Basic: Older systems that meet basic needs with some limitations",
                            "Standard: Modern systems for core functions, some integration possible",
                            "Advanced: Up-to-date systems with good integration capabilities",
                            "Cutting-edge: Latest technology stack with AI-ready architecture",
                        ],
                    ),
                    Question::new(
                        "2.2",
                        "section2",
                        "Cloud Readiness",
                        "What is your current cloud computing adoption level?",
                        [
                            "None: All systems on-premise, no cloud experience",
                            "Minimal: Limited cloud usage (email, basic storage)",
                            "Moderate: Some applications in cloud, hybrid approach",
                            "Significant: Most systems cloud-based or cloud-ready",
                            "Full: Cloud-native operations with advanced services usage",
                        ],
                    ),
                    Question::new(
                        "2.3",
                        "section2",
                        "Internet & Connectivity",
                        "How reliable and fast is your internet connectivity?",
                        [
                            "Poor: Frequent outages, very slow speeds, limits operations",
                            "Unreliable: Occasional outages, adequate speeds for basic operations",
                            "Adequate: Generally reliable, sufficient for current needs",
                            "Good: Reliable high-speed connection with backup options",
                            "Excellent: Enterprise-grade connectivity with redundancy and high availability",
                        ],
                    ),
                    Question::new(
                        "2.4",
                        "section2",
                        "Security Infrastructure",
                        "How comprehensive are your current cybersecurity measures?",
                        [
                            "Minimal: Basic antivirus, limited security measures",
                            "Basic: Standard security software, basic access controls",
                            "Standard: Good security practices, some advanced measures",
                            "Advanced: Comprehensive security suite, regular updates and monitoring",
                            "Enterprise: Advanced threat detection, incident response, compliance frameworks",
                        ],
                    ),
                ],
            ),
            Section::new(
                "section3",
                "Human Resources & Skills",
                "Evaluate technical skills, data literacy, change management capability, and leadership support",
                vec![
                    Question::new(
                        "3.1",
                        "section3",
                        "Technical Skills",
                        "What level of technical expertise exists in your organization?",
                        [
                            "Limited: Basic computer skills, no advanced technical capabilities",
                            "Basic: Some technical skills, can manage standard software",
                            "Moderate: Good technical skills, can learn and adapt to new tools",
                            "Advanced: Strong technical team, some data analysis capabilities",
                            "Expert: Data scientists, developers, or AI specialists on staff",
                        ],
                    ),
                    Question::new(
                        "3.2",
                        "section3",
                        "Data Literacy",
                        "How comfortable is your team with analyzing and using data for decision-making?",
                        [
                            "Low: Decisions based on intuition, limited data usage",
                            "Basic: Some data analysis, mostly basic reports",
                            "Moderate: Regular use of data for decisions, basic analytics",
                            "Good: Data-driven culture, advanced analytics usage",
                            "High: Strong analytical capabilities, data science expertise",
                        ],
                    ),
                    Question::new(
                        "3.3",
                        "section3",
                        "Change Management Capability",
                        "How well does your organization adapt to new technologies and processes?",
                        [
                            "Resistant: Strong resistance to change, slow adoption of new tools",
                            "Cautious: Slow to adopt new technologies, prefers familiar methods",
                            "Moderate: Open to change with proper support and training",
                            "Adaptable: Quick to learn and implement new technologies",
                            "Innovative: Embraces change, actively seeks new technological solutions",
                        ],
                    ),
                    Question::new(
                        "3.4",
                        "section3",
                        "Leadership Support",
                        "How committed is senior leadership to digital transformation and AI adoption?",
                        [
                            "Skeptical: Leadership questions value of new technology investments",
                            "Cautious: Some interest but limited commitment to change",
                            "Supportive: Generally supportive with adequate budget allocation",
                            "Championing: Strong support with significant resource commitment",
                            "Visionary: AI/digital transformation is a strategic priority with full backing",
                        ],
                    ),
                ],
            ),
            Section::new(
                "section4",
                "Business Process Maturity",
                "Assess process documentation, automation level, and performance measurement capabilities",
                vec![
                    Question::new(
                        "4.1",
                        "section4",
                        "Process Documentation",
                        "How well are your business processes documented and standardized?",
                        [
                            "Informal: Processes exist in people's heads, no documentation",
                            "Basic: Some key processes documented informally",
                            "Standard: Most processes documented with basic standardization",
                            "Comprehensive: Well-documented, standardized processes",
                            "Optimized: Detailed process documentation with continuous improvement",
                        ],
                    ),
                    Question::new(
                        "4.2",
                        "section4",
                        "Process Automation Level",
                        "What percentage of your routine business processes are currently automated?",
                        [
                            "Manual: Less than 10% automation, mostly manual processes",
                            "Limited: 10-25% automation, basic tools usage",
                            "Moderate: 25-50% automation, some workflow tools",
                            "Significant: 50-75% automation, advanced workflow systems",
                            "High: 75%+ automation, sophisticated process management",
                        ],
                    ),
                    Question::new(
                        "4.3",
                        "section4",
                        "Performance Measurement",
                        "How well do you measure and track business process performance?",
                        [
                            "Minimal: Limited measurement, mostly financial metrics",
                            "Basic: Some KPIs tracked, irregular monitoring",
                            "Standard: Regular KPI tracking, basic performance management",
                            "Advanced: Comprehensive metrics, dashboards, regular analysis",
                            "Sophisticated: Real-time monitoring, predictive analytics, continuous optimization",
                        ],
                    ),
                ],
            ),
            Section::new(
                "section5",
                "Strategic & Financial Readiness",
                "Evaluate strategic vision and budget allocation for digital transformation",
                vec![
                    Question::new(
                        "5.1",
                        "section5",
                        "Strategic Vision",
                        "How clear is your organization's digital transformation strategy?",
                        [
                            "None: No digital strategy or vision",
                            "Vague: Some ideas but no formal strategy",
                            "Developing: Strategy in development, some clarity",
                            "Clear: Well-defined digital transformation strategy",
                            "Comprehensive: Detailed AI/digital strategy with clear roadmap",
                        ],
                    ),
                    Question::new(
                        "5.2",
                        "section5",
                        "Budget Allocation",
                        "What percentage of your annual budget is allocated to technology and innovation?",
                        [
                            "Minimal: Less than 2% of budget for technology",
                            "Limited: 2-5% budget allocation for technology",
                            "Standard: 5-10% allocated to technology improvements",
                            "Significant: 10-15% budget for technology and innovation",
                            "Strategic: 15%+ investment in technology as competitive advantage",
                        ],
                    ),
                ],
            ),
            Section::new(
                "section6",
                "Regulatory & Compliance Readiness",
                "Assess compliance with data protection laws and risk management frameworks",
                vec![
                    Question::new(
                        "6.1",
                        "section6",
                        "Data Protection Compliance",
                        "How well does your organization comply with Kenya's Data Protection Act 2019?",
                        [
                            "Unaware: Not familiar with requirements, no compliance measures",
                            "Aware: Know requirements exist but limited compliance",
                            "Developing: Working towards compliance, some measures in place",
                            "Compliant: Generally compliant with most requirements",
                            "Exemplary: Full compliance with best practices implementation",
                        ],
                    ),
                    Question::new(
                        "6.2",
                        "section6",
                        "Risk Management Framework",
                        "How mature is your organization's approach to managing technology and data risks?",
                        [
                            "Informal: No formal risk management for technology",
                            "Basic: Some awareness of risks, informal management",
                            "Developing: Risk assessment processes being developed",
                            "Established: Formal risk management framework in place",
                            "Mature: Comprehensive risk management with regular assessments",
                        ],
                    ),
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::ContentCatalog;
    use crate::model::Score;

    #[test]
    fn reference_catalog_is_valid() {
        let catalog = ContentCatalog::reference().unwrap();
        assert_eq!(catalog.section_count(), 6);
        assert_eq!(catalog.question_count(), 20);

        let points: Vec<u32> = catalog.sections().iter().map(|s| s.max_points()).collect();
        assert_eq!(points, vec![25, 20, 20, 15, 10, 10]);
        assert_eq!(catalog.total_possible_score(), 100);
    }

    #[test]
    fn every_reference_question_has_a_full_rubric() {
        let catalog = ContentCatalog::reference().unwrap();
        for section in catalog.sections() {
            for question in &section.questions {
                assert_eq!(question.rubric.len(), 5, "question {}", question.id);
                let top = Score::new(5).unwrap();
                assert!(question.rubric_for(top).is_some());
            }
        }
    }
}
